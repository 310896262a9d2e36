#![forbid(unsafe_code)]

use std::cell::RefCell;

use ftui::prelude::*;
use ftui::core::geometry::Rect;
use ftui::layout::{Constraint, Flex};
use ftui::style::Style;
use ftui::text::{Text, WrapMode, display_width};
use ftui::widgets::block::Block;
use ftui::widgets::borders::Borders;
use ftui::widgets::paragraph::Paragraph;
use ftui::widgets::status_line::{StatusItem, StatusLine};
use ftui::widgets::table::{Row, Table, TableState};
use ftui::widgets::{StatefulWidget, Widget};

use crate::app::ThemeColors;
use crate::controller::Controller;
use crate::fs_ops::{FileSystem, format_row_time};
use crate::menu::MENU_TITLES;
use crate::model::{EntryKind, MenuItem};
use crate::overlay::{DialogKind, Overlay};

pub const MENU_HEIGHT: u16 = 1;
pub const PATH_HEIGHT: u16 = 1;
pub const STATUS_HEIGHT: u16 = 1;
pub const KEYBAR_HEIGHT: u16 = 1;
pub const HEADER_HEIGHT: u16 = 1;

pub const FOOTER_HINTS: [(&str, &str); 6] = [
    ("↑/↓", "Navigate"),
    ("Enter", "Open"),
    ("Backspace", "Go Up"),
    ("F10", "Menu"),
    ("Esc", "Close Menu"),
    ("Ctrl+Q", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub name: String,
    pub modified: String,
    pub summary: String,
    pub kind: EntryKind,
}

/// Everything one frame shows, derived from the controller after each
/// keystroke. The overlay is drawn on top of the rest.
#[derive(Debug, Clone)]
pub struct View {
    pub header: String,
    pub rows: Vec<RowView>,
    pub highlighted: Option<usize>,
    pub placeholder: Option<String>,
    pub listing_failed: bool,
    pub details: Vec<String>,
    pub status: String,
    pub hints: &'static [(&'static str, &'static str)],
    pub overlay: Option<Overlay>,
}

pub fn compose<F: FileSystem>(controller: &Controller<F>) -> View {
    let directory = controller.directory();
    let rows = directory
        .entries()
        .iter()
        .map(|entry| RowView {
            name: entry.display_name(),
            modified: format_row_time(entry.modified),
            summary: entry.summary.clone(),
            kind: entry.kind,
        })
        .collect::<Vec<_>>();
    let listing_failed = controller.listing_error().is_some();
    let placeholder = if rows.is_empty() {
        Some(
            controller
                .listing_error()
                .map(str::to_string)
                .unwrap_or_else(|| String::from("(empty directory)")),
        )
    } else {
        None
    };
    View {
        header: format!("Directory: {}", directory.current_dir().display()),
        rows,
        highlighted: directory.selected(),
        placeholder,
        listing_failed,
        details: directory.selected_details().lines(),
        status: controller.status().to_string(),
        hints: &FOOTER_HINTS,
        overlay: controller.overlays().active().cloned(),
    }
}

pub fn ensure_visible(state: &mut TableState, view_height: usize) {
    if view_height == 0 {
        return;
    }
    let Some(selected) = state.selected else {
        state.offset = 0;
        return;
    };
    if selected < state.offset {
        state.offset = selected;
    } else if selected >= state.offset + view_height {
        state.offset = selected.saturating_sub(view_height - 1);
    }
}

/// Column where the `idx`-th menu title starts in the menu bar.
pub fn menu_title_offset(idx: usize) -> u16 {
    MENU_TITLES
        .iter()
        .take(idx)
        .map(|title| title.len() as u16 + 2)
        .sum::<u16>()
}

pub fn render(frame: &mut Frame, view: &View, theme: ThemeColors, table_state: &RefCell<TableState>) {
    let full = Rect::new(0, 0, frame.width(), frame.height());
    let background = Block::new().style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg));
    background.render(full, frame);

    let layout = Flex::vertical().constraints([
        Constraint::Fixed(MENU_HEIGHT),
        Constraint::Fixed(PATH_HEIGHT),
        Constraint::Fill,
        Constraint::Fixed(STATUS_HEIGHT),
        Constraint::Fixed(KEYBAR_HEIGHT),
    ]);
    let areas = layout.split(full);

    let active_menu = match &view.overlay {
        Some(Overlay::Menu(menu)) => menu.bar_index,
        _ => None,
    };
    render_menu_bar(frame, areas[0], active_menu, theme);

    let path = Paragraph::new(Text::from(view.header.as_str()))
        .style(Style::new().fg(theme.path_fg).bg(theme.screen_bg));
    path.render(areas[1], frame);

    let columns = Flex::horizontal().constraints([Constraint::Ratio(9, 14), Constraint::Ratio(5, 14)]);
    let body = columns.split(areas[2]);
    render_listing(frame, body[0], view, theme, table_state);
    render_details(frame, body[1], view, theme);

    let status = Paragraph::new(Text::from(view.status.as_str()))
        .style(Style::new().fg(theme.header_fg).bg(theme.header_bg));
    status.render(areas[3], frame);
    render_keybar(frame, areas[4], view.hints, theme);

    match &view.overlay {
        Some(Overlay::Menu(menu)) => {
            let x = menu.bar_index.map(menu_title_offset).unwrap_or(0);
            render_menu(frame, x, &menu.title, &menu.items, menu.cursor, theme);
        }
        Some(Overlay::Dialog(dialog)) => {
            let buttons = dialog
                .buttons()
                .iter()
                .map(|button| {
                    if *button == dialog.focus {
                        format!("[>{}<]", button.label())
                    } else {
                        format!("[ {} ]", button.label())
                    }
                })
                .collect::<Vec<_>>()
                .join("   ");
            render_dialog(frame, dialog.kind, &dialog.title, &dialog.message, &buttons, theme);
        }
        None => {}
    }
}

fn render_menu_bar(frame: &mut Frame, area: Rect, active: Option<usize>, theme: ThemeColors) {
    let bar = Block::new().style(Style::new().fg(theme.menu_fg).bg(theme.menu_bg));
    bar.render(area, frame);
    let mut x = area.x;
    for (idx, title) in MENU_TITLES.iter().enumerate() {
        let width = title.len() as u16 + 2;
        if x >= area.x + area.width {
            break;
        }
        let style = if active == Some(idx) {
            Style::new().fg(theme.menu_selected_fg).bg(theme.menu_selected_bg)
        } else {
            Style::new().fg(theme.menu_fg).bg(theme.menu_bg)
        };
        let cell = Rect::new(x, area.y, width.min(area.x + area.width - x), 1);
        Paragraph::new(Text::from(format!(" {title} "))).style(style).render(cell, frame);
        x += width;
    }
}

fn render_listing(
    frame: &mut Frame,
    area: Rect,
    view: &View,
    theme: ThemeColors,
    table_state: &RefCell<TableState>,
) {
    let block = Block::bordered()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg))
        .title("Files and Directories");

    if let Some(placeholder) = &view.placeholder {
        let fg = if view.listing_failed {
            Style::new().fg(theme.error_fg).bg(theme.screen_bg)
        } else {
            Style::new().fg(theme.normal_fg).bg(theme.screen_bg)
        };
        Paragraph::new(Text::from(placeholder.as_str()))
            .wrap(WrapMode::Word)
            .style(fg)
            .block(block)
            .render(area, frame);
        return;
    }

    let header = Row::new(["Name", "Modified", "Size"])
        .style(Style::new().fg(theme.header_fg).bg(theme.header_bg))
        .height(HEADER_HEIGHT);

    let rows = view
        .rows
        .iter()
        .map(|row| {
            let fg = match row.kind {
                EntryKind::Parent | EntryKind::Dir => theme.dir_fg,
                EntryKind::File => theme.normal_fg,
            };
            Row::new([row.name.clone(), row.modified.clone(), row.summary.clone()])
                .height(1)
                .style(Style::new().fg(fg).bg(theme.screen_bg))
        })
        .collect::<Vec<_>>();

    let widths = [Constraint::Fill, Constraint::Fixed(17), Constraint::Fixed(11)];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg))
        .highlight_style(Style::new().fg(theme.selected_fg).bg(theme.selected_bg));

    let mut state = table_state.borrow_mut();
    state.select(view.highlighted);
    let visible = area.height.saturating_sub(2 + HEADER_HEIGHT) as usize;
    ensure_visible(&mut state, visible);
    StatefulWidget::render(&table, area, frame, &mut state);
}

fn render_details(frame: &mut Frame, area: Rect, view: &View, theme: ThemeColors) {
    let block = Block::bordered()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg))
        .title("Item Details");
    Paragraph::new(Text::from(view.details.join("\n")))
        .wrap(WrapMode::Word)
        .style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg))
        .block(block)
        .render(area, frame);
}

fn render_keybar(frame: &mut Frame, area: Rect, hints: &[(&'static str, &'static str)], theme: ThemeColors) {
    let bg = Block::new().style(Style::new().fg(theme.header_fg).bg(theme.header_bg));
    bg.render(area, frame);
    let mut status = StatusLine::new().style(Style::new().fg(theme.header_fg).bg(theme.header_bg));
    for (key, label) in hints {
        status = status.right(StatusItem::key_hint(*key, *label));
    }
    status.render(area, frame);
}

fn render_menu(
    frame: &mut Frame,
    x: u16,
    title: &str,
    items: &[MenuItem],
    cursor: Option<usize>,
    theme: ThemeColors,
) {
    let inner_width = items
        .iter()
        .map(|item| match item {
            MenuItem::Action { label, .. } => label.chars().count() + 2,
            MenuItem::Separator => 0,
        })
        .max()
        .unwrap_or(0)
        .max(18) as u16;
    let width = (inner_width + 2).min(frame.width().saturating_sub(x));
    // title, divider, items, footer, two border rows
    let height = (items.len() as u16 + 5).min(frame.height().saturating_sub(MENU_HEIGHT));
    let area = Rect::new(x, MENU_HEIGHT, width, height);

    let style = Style::new().fg(theme.menu_selected_fg).bg(theme.menu_selected_bg);
    Block::new().style(style).render(area, frame);

    let divider = "─".repeat(inner_width as usize);
    let mut lines = vec![format!(" {title}"), divider.clone()];
    for (idx, item) in items.iter().enumerate() {
        match item {
            MenuItem::Action { label, .. } => {
                let marker = if cursor == Some(idx) { ">" } else { " " };
                lines.push(format!("{marker} {label}"));
            }
            MenuItem::Separator => lines.push(divider.clone()),
        }
    }
    lines.push(String::from(" [ESC] Close "));

    let block = Block::bordered()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(theme.menu_divider_fg).bg(theme.menu_selected_bg))
        .style(style);
    Paragraph::new(Text::from(lines.join("\n")))
        .wrap(WrapMode::None)
        .style(style)
        .block(block)
        .render(area, frame);
}

/// Rows `text` occupies when word-wrapped to `width` columns. Words wider
/// than a row are broken across rows.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return text.split('\n').count();
    }
    let mut total = 0;
    for line in text.split('\n') {
        let mut rows = 1;
        let mut used = 0;
        for word in line.split_whitespace() {
            let w = display_width(word);
            let needed = if used == 0 { w } else { used + 1 + w };
            if needed <= width {
                used = needed;
                continue;
            }
            if used > 0 {
                rows += 1;
            }
            rows += w.saturating_sub(1) / width;
            used = w.saturating_sub(1) % width + 1;
        }
        total += rows;
    }
    total
}

/// Centered box sized to hold the wrapped message, a blank row and the
/// button row inside its border.
pub fn dialog_area(full: Rect, message: &str) -> Rect {
    let width = (full.width / 2).max(40).min(full.width);
    let inner = width.saturating_sub(2) as usize;
    let rows = wrapped_line_count(message, inner) + 2;
    let height = (rows as u16).saturating_add(2).min(full.height);
    let x = full.x + full.width.saturating_sub(width) / 2;
    let y = full.y + full.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_dialog(
    frame: &mut Frame,
    kind: DialogKind,
    title: &str,
    message: &str,
    buttons: &str,
    theme: ThemeColors,
) {
    let full = Rect::new(0, 0, frame.width(), frame.height());
    let area = dialog_area(full, message);

    let style = match kind {
        DialogKind::Error => Style::new().fg(theme.error_fg).bg(theme.error_bg),
        DialogKind::Confirm | DialogKind::Info => Style::new().fg(theme.dialog_fg).bg(theme.dialog_bg),
    };
    Block::new().style(style).render(area, frame);

    let text = format!("{message}\n\n{buttons}");
    let block = Block::bordered()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(theme.menu_divider_fg))
        .style(style)
        .title(title);
    Paragraph::new(Text::from(text))
        .wrap(WrapMode::Word)
        .style(style)
        .block(block)
        .render(area, frame);
}
