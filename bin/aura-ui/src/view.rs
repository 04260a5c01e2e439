//! ---
//! aura_section: "06-presentation"
//! aura_subsection: "binary"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Rendering for the terminal dashboard."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use aura_common::clock_label;
use aura_core::{AppState, BookingFlowStage, ServiceSlot, Speaker};
use aura_sim::FAILURE_THRESHOLD_PCT;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Mode, PICKER_ROWS};

const LOW_VOLTAGE_V: f64 = 11.8;
const HIGH_FATIGUE_PCT: f64 = 80.0;

pub fn draw(frame: &mut Frame, app: &App, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, state, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(layout[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(body[0]);
    draw_telemetry(frame, state, left[0]);
    draw_health(frame, state, left[1]);
    draw_agents(frame, state, left[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(booking_height(state)),
            Constraint::Length(7),
        ])
        .split(body[1]);
    draw_transcript(frame, state, right[0]);
    draw_booking(frame, state, right[1]);
    draw_system_log(frame, state, right[2]);

    draw_input(frame, app, state, layout[2]);
    draw_help(frame, app, state, layout[3]);

    if state.picker_open() {
        draw_picker(frame, app, state);
    }
}

fn draw_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let scenario = match state.scenario() {
        Some(scenario) => Span::styled(
            format!("Scenario: {}", scenario.title()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("No active scenario", Style::default().fg(Color::Green)),
    };
    let line = Line::from(vec![
        Span::styled(
            "AURA ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("connected vehicle assistant  |  "),
        scenario,
        Span::raw(format!("  |  stage: {}  |  tick {}", state.stage(), state.tick())),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn reading(label: &str, value: String, alert: bool) -> Line<'static> {
    let style = if alert {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
        Span::styled(value, style),
    ])
}

fn draw_telemetry(frame: &mut Frame, state: &AppState, area: Rect) {
    let t = state.telemetry().rounded();
    let lines = vec![
        reading("Voltage", format!("{:.2} V", t.voltage_v), t.voltage_v < LOW_VOLTAGE_V),
        reading("Engine temp", format!("{:.0} °C", t.engine_temp_c), t.engine_temp_c > 100.0),
        reading("RPM", format!("{:.0}", t.rpm), false),
        reading("Speed", format!("{:.0} km/h", t.speed_kph), false),
        reading("Emission", format!("{:.0}", t.emission_score), false),
        reading("Fatigue", format!("{:.0} %", t.fatigue_pct), t.fatigue_pct > HIGH_FATIGUE_PCT),
        reading("Heart rate", format!("{:.0} bpm", t.heart_rate_bpm), false),
        reading("Stress", format!("{:.0} %", t.stress_pct), false),
        reading("Cabin", format!("{:.1} °C", t.cabin_temp_c), false),
        reading("Eco score", format!("{:.0}", t.eco_score), false),
    ];
    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Telemetry"));
    frame.render_widget(panel, area);
}

fn draw_health(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Component Health");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(2); PICKER_ROWS.len()])
        .split(inner);
    for ((component, pct), row) in state.health().iter().zip(rows.iter()) {
        let color = if pct < FAILURE_THRESHOLD_PCT {
            Color::Red
        } else if pct < 60.0 {
            Color::Yellow
        } else {
            Color::Green
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio((pct / 100.0).clamp(0.0, 1.0))
            .label(format!("{}  {:.0}%", component.label(), pct));
        frame.render_widget(gauge, *row);
    }
}

fn draw_agents(frame: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .agents()
        .iter()
        .map(|(agent, active)| {
            let (marker, style) = if active {
                ("●", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Line::from(Span::styled(
                format!("{marker} {}", agent.log_label()),
                style,
            )))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Agents"));
    frame.render_widget(list, area);
}

fn draw_transcript(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut lines = Vec::new();
    for entry in state.transcript().entries() {
        let (who, style) = match entry.speaker {
            Speaker::Assistant => ("AURA", Style::default().fg(Color::Cyan)),
            Speaker::User => ("You", Style::default().fg(Color::Magenta)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", entry.time_label()), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{who}: "), style.add_modifier(Modifier::BOLD)),
            Span::raw(entry.text.clone()),
        ]));
    }
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible).min(u16::MAX as usize) as u16;
    let title = if state.chat_pending() {
        "Dialogue (AURA is thinking...)"
    } else {
        "Dialogue"
    };
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn booking_height(state: &AppState) -> u16 {
    match state.booking() {
        None => 0,
        Some(BookingFlowStage::Prompt) => 3,
        Some(BookingFlowStage::SlotSelection) => 6,
    }
}

fn draw_booking(frame: &mut Frame, state: &AppState, area: Rect) {
    let lines = match state.booking() {
        None => return,
        Some(BookingFlowStage::Prompt) => vec![Line::from(vec![
            Span::styled("[y] ", Style::default().fg(Color::Green)),
            Span::raw(state.accept_label()),
            Span::raw("    "),
            Span::styled("[n] ", Style::default().fg(Color::Red)),
            Span::raw("Later"),
        ])],
        Some(BookingFlowStage::SlotSelection) => ServiceSlot::ALL
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Yellow)),
                    Span::raw(slot.label()),
                ])
            })
            .collect(),
    };
    let prompt = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Action Required")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(prompt, area);
}

fn draw_system_log(frame: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .system_log()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", clock_label(entry.stamp)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{}: ", entry.agent), Style::default().fg(Color::Cyan)),
                Span::raw(entry.action.clone()),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("System Log"));
    frame.render_widget(list, area);
}

fn draw_input(frame: &mut Frame, app: &App, state: &AppState, area: Rect) {
    let voice = state.voice();
    let (text, style) = if voice.listening {
        ("Listening...".to_owned(), Style::default().fg(Color::Red))
    } else if app.mode == Mode::Input {
        (format!("> {}_", voice.draft), Style::default().fg(Color::White))
    } else {
        (format!("> {}", voice.draft), Style::default().fg(Color::Gray))
    };
    let title = if app.mode == Mode::Input {
        "Message (Enter send, Esc leave)"
    } else {
        "Message"
    };
    let input = Paragraph::new(Span::styled(text, style))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn draw_help(frame: &mut Frame, app: &App, state: &AppState, area: Rect) {
    if let Some(status) = &app.status {
        let line = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(line, area);
        return;
    }
    let help = if state.picker_open() {
        "↑/↓ move  space toggle  enter confirm  esc cancel"
    } else if state.scenario().is_some() {
        "r reset  i type  v talk  q quit"
    } else {
        "1 alternator  2 fatigue  3 end-of-life  r reset  i type  v talk  q quit"
    };
    frame.render_widget(Paragraph::new(help).style(Style::default().fg(Color::Gray)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_picker(frame: &mut Frame, app: &App, state: &AppState) {
    let area = centered(frame.size(), 44, PICKER_ROWS.len() as u16 + 4);
    let items: Vec<ListItem> = PICKER_ROWS
        .iter()
        .map(|component| {
            let mark = if state.selection().contains(*component) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(format!("{mark} {}", component.label()))
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(app.picker_cursor));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select end-of-life components"),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}
