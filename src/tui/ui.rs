//! UI rendering for the visualizer.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::bits::from_twos_complement;
use crate::booth::trace::{format_step, to_binary};
use super::app::{BoothApp, Field};

/// Log entries shown at once.
const LOG_LINES: usize = 8;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &BoothApp) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(LOG_LINES as u16 + 2),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_inputs(frame, rows[0], app);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(rows[1]);
    let engine = &app.engine;
    draw_register(frame, top[0], "Register A", engine.a(), engine.bits(), Color::Cyan);
    draw_register(frame, top[1], "Register Q", engine.q(), engine.bits(), Color::Green);
    draw_history_bit(frame, top[2], engine.q1());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(rows[2]);
    draw_register(frame, middle[0], "Register M (Multiplicand)", engine.m(), engine.bits(), Color::LightRed);
    draw_product(frame, middle[1], app);

    draw_log(frame, rows[3], app);
    draw_footer(frame, rows[4], app);
}

/// Draw the input fields, width selector and key help.
fn draw_inputs(frame: &mut Frame, area: Rect, app: &BoothApp) {
    let field_style = |field: Field| {
        if app.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let line = Line::from(vec![
        Span::raw("M: "),
        Span::styled(format!("[{:<8}]", app.multiplicand.text), field_style(Field::Multiplicand)),
        Span::raw("  Q: "),
        Span::styled(format!("[{:<8}]", app.multiplier.text), field_style(Field::Multiplier)),
        Span::raw("  Width: "),
        Span::styled(format!("{} bits", app.selected_bits()), Style::default().fg(Color::Cyan)),
        Span::styled(
            "   s: Step  r: Run  x/Enter: Reset  w: Width  Tab: Field  q: Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default()
            .title(" Word Multiplier - Booth's Algorithm ")
            .borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

/// Draw a register card: unsigned, signed and binary.
fn draw_register(frame: &mut Frame, area: Rect, label: &str, value: u64, bits: u32, accent: Color) {
    let content = vec![
        Line::from(vec![
            Span::raw("unsigned: "),
            Span::raw(value.to_string()),
        ]),
        Line::from(vec![
            Span::raw("signed:   "),
            Span::raw(from_twos_complement(value, bits).to_string()),
        ]),
        Line::from(Span::styled(to_binary(value as u128, bits), Style::default().fg(Color::Yellow))),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(format!(" {} ({} bits) ", label, bits))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)));

    frame.render_widget(paragraph, area);
}

/// Draw the Q₋₁ card.
fn draw_history_bit(frame: &mut Frame, area: Rect, q1: u8) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        q1.to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default()
        .title(" Q-1 (1 bit) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(paragraph, area);
}

/// Draw the A:Q product preview.
fn draw_product(frame: &mut Frame, area: Rect, app: &BoothApp) {
    let engine = &app.engine;
    let mut content = vec![
        Line::from(format!("unsigned: {}", engine.product_unsigned())),
        Line::from(format!("signed:   {}", engine.product_signed())),
        Line::from(Span::styled(
            to_binary(engine.product_unsigned(), engine.width().product_bits()),
            Style::default().fg(Color::Yellow),
        )),
    ];
    if engine.multiplicand_negation_overflows() {
        content.push(Line::from(Span::styled(
            "M is the most negative value: A - M wraps",
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Product Preview (A Q) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(paragraph, area);
}

/// Draw the operation log, latest on top.
fn draw_log(frame: &mut Frame, area: Rect, app: &BoothApp) {
    let items: Vec<ListItem> = app
        .recent_steps(LOG_LINES)
        .enumerate()
        .map(|(i, snap)| {
            let style = if i == 0 {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format_step(snap)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Operation Log (latest on top) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw progress and status.
fn draw_footer(frame: &mut Frame, area: Rect, app: &BoothApp) {
    let style = if app.engine.is_done() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(app.footer(), style),
        Span::raw("   "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Cyan)),
    ]))
    .block(Block::default()
        .title(" Status ")
        .borders(Borders::ALL));

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use ratatui::backend::TestBackend;

    fn render(app: &BoothApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_fresh_engine() {
        let app = BoothApp::new(SimConfig::default());
        let screen = render(&app);

        assert!(screen.contains("Register A (8 bits)"));
        assert!(screen.contains("Register M (Multiplicand) (8 bits)"));
        assert!(screen.contains("11111101")); // Q = -3
        assert!(screen.contains("Step: 0/8"));
    }

    #[test]
    fn test_draw_after_run() {
        let mut app = BoothApp::new(SimConfig::default());
        app.engine.run();
        let screen = render(&app);

        assert!(screen.contains("signed:   -21"));
        assert!(screen.contains("Step  8:"));
    }
}
