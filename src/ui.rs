use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use pokedex::action::Action;
use pokedex::state::{AppState, Item, Tab};
use pokedex::view::{ViewModel, ViewSource};

use crate::DexComponentId;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(222, 96, 96);
const PAGE_JUMP: i16 = 10;

pub struct DexUi {
    list: SelectList,
    status_bar: StatusBar,
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let view = state.view();
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state, event_ctx);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);
        render_list(frame, body[0], state, &view, event_ctx, &mut self.list);
        render_detail(frame, body[1], state);

        render_footer(frame, layout[2], state, &view, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Char('f') => vec![Action::ToggleFavorite],
                crossterm::event::KeyCode::Char('x') => vec![Action::SearchClear],
                crossterm::event::KeyCode::Char('n') => vec![Action::PageLoadNext],
                crossterm::event::KeyCode::Char('g') | crossterm::event::KeyCode::Home => {
                    vec![Action::SelectionJumpTop]
                }
                crossterm::event::KeyCode::Char('G') | crossterm::event::KeyCode::End => {
                    vec![Action::SelectionJumpBottom]
                }
                crossterm::event::KeyCode::PageDown => vec![Action::SelectionMove(PAGE_JUMP)],
                crossterm::event::KeyCode::PageUp => vec![Action::SelectionMove(-PAGE_JUMP)],
                _ => {
                    let view = state.view();
                    let items = list_rows(state, &view);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::SelectionSet,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> =
                        self.list.handle_event(event, props).into_iter().collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
                crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
                crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
                crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        // The search box swallows every key while open.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    if state.search.active {
        event_ctx.set_component_area(DexComponentId::Search, area);
    } else {
        event_ctx.component_areas.remove(&DexComponentId::Search);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("POKEDEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(if state.search.active {
            ACCENT_TEAL
        } else {
            TEXT_DIM
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let titles = vec![
        Line::from(Tab::All.label()),
        Line::from(format!(
            "{} ({})",
            Tab::Favorites.label(),
            state.favorites.count()
        )),
    ];
    let selected = match state.tab {
        Tab::All => 0,
        Tab::Favorites => 1,
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, rows[0]);

    let input = &state.search.input;
    let search = if state.search.active {
        format!("/{input}_")
    } else if input.is_empty() {
        "/ to search".to_string()
    } else {
        format!("/{input}")
    };
    let pending = if state.search.debouncer.is_pending() {
        " ..."
    } else {
        ""
    };
    let line = Line::from(vec![
        Span::raw(" Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
        Span::styled(pending, Style::default().fg(TEXT_DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), rows[1]);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewModel,
    event_ctx: &mut EventContext<DexComponentId>,
    list: &mut SelectList,
) {
    event_ctx.set_component_area(DexComponentId::List, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(state, view))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(placeholder) = placeholder(state, view) {
        let paragraph = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        return;
    }

    let items = list_rows(state, view);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: !state.search.active,
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::SelectionSet,
        render_item: &|item| item.clone(),
    };
    list.render(frame, inner, props);
}

fn list_title(state: &AppState, view: &ViewModel) -> String {
    match view.source {
        ViewSource::Search => format!("RESULTS: {}", state.search.committed()),
        ViewSource::Favorites => "FAVORITES".to_string(),
        ViewSource::Listing => format!(
            "ALL {}/{}",
            state.paginator.item_count(),
            state.paginator.total()
        ),
    }
}

fn placeholder(state: &AppState, view: &ViewModel) -> Option<Text<'static>> {
    if view.is_loading {
        return Some(Text::styled("Loading...", Style::default().fg(ACCENT_GOLD)));
    }
    if let Some(error) = &view.error {
        if view.displayed_items.is_empty() {
            return Some(Text::styled(
                format!("Error: {error}"),
                Style::default().fg(ACCENT_RED),
            ));
        }
    }
    if view.show_no_results {
        let message = match view.source {
            ViewSource::Favorites => "No favorites yet. Press f on a Pokemon to add it.",
            ViewSource::Search if state.tab == Tab::Favorites => "No favorites match the search.",
            ViewSource::Search | ViewSource::Listing => "No Pokemon found.",
        };
        return Some(Text::styled(message, Style::default().fg(TEXT_DIM)));
    }
    None
}

fn list_rows(state: &AppState, view: &ViewModel) -> Vec<Line<'static>> {
    view.displayed_items
        .iter()
        .map(|item| {
            let mark = if state.favorites.contains(&item.name) {
                "★"
            } else {
                " "
            };
            Line::from(format!("{mark} #{:03} {}", item.id, format_name(&item.name)))
        })
        .collect()
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DATA")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let text = state
        .selected_item()
        .map(|item| detail_text(&item, state.favorites.contains(&item.name)))
        .unwrap_or_else(|| Text::styled("Nothing selected", Style::default().fg(TEXT_DIM)));
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn detail_text(item: &Item, is_favorite: bool) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let title = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("#{:03} ", item.id), label),
            Span::styled(format_name(&item.name), title),
            Span::styled(
                if is_favorite { "  ★" } else { "" },
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Type:   ", label),
            Span::styled(
                item.types
                    .iter()
                    .map(|name| name.to_ascii_uppercase())
                    .collect::<Vec<_>>()
                    .join(" / "),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Height: ", label),
            Span::styled(format!("{:.1} m", item.height as f32 / 10.0), value),
        ]),
        Line::from(vec![
            Span::styled("Weight: ", label),
            Span::styled(format!("{:.1} kg", item.weight as f32 / 10.0), value),
        ]),
    ];
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Sprite: ", label),
        Span::styled(item.sprite.clone(), Style::default().fg(TEXT_DIM)),
    ]));
    Text::from(lines)
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewModel,
    status_bar: &mut StatusBar,
) {
    let status = state.message.clone().unwrap_or_else(|| {
        if view.is_fetching_next {
            "Loading more...".to_string()
        } else if state.search.debouncer.is_pending() {
            "Waiting for input...".to_string()
        } else if view.source == ViewSource::Listing && !state.paginator.has_next_page() {
            "End of list".to_string()
        } else {
            String::new()
        }
    });
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    vec![
        StatusBarHint::new("j/k", "Move"),
        StatusBarHint::new("f", "Favorite"),
        StatusBarHint::new("Tab", "All/Favorites"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("x", "Clear"),
        StatusBarHint::new("r", "Refresh"),
        StatusBarHint::new("q", "Quit"),
    ]
}

fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
