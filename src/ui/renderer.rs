use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{self, Cell, Phase, Snapshot};

pub fn ui(f: &mut Frame, snapshot: &Snapshot) {
    let size = f.size();

    let board_height = BOARD_HEIGHT as u16 + 2;
    let board_width = BOARD_WIDTH as u16 * 2 + 2; // 2 chars per cell

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_height),
            Constraint::Min(1),
        ])
        .split(size);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(15),          // Stats panel
            Constraint::Length(board_width), // Game board
            Constraint::Length(15),          // Next pill panel
            Constraint::Min(1),
        ])
        .split(vertical_chunks[1]);

    let left_info_area = horizontal_chunks[1];
    let board_area = horizontal_chunks[2];
    let right_info_area = horizontal_chunks[3];

    render_board(f, snapshot, board_area);
    render_stats(f, snapshot, left_info_area);
    render_next_pill(f, snapshot, right_info_area);

    if snapshot.paused {
        render_paused_overlay(f, board_area);
        return;
    }
    match snapshot.phase {
        Phase::LevelComplete => render_level_complete_overlay(f, snapshot, board_area),
        Phase::GameOver => render_game_over_overlay(f, snapshot, board_area),
        Phase::Falling | Phase::Resolving => {}
    }
}

pub fn term_color(color: game::Color) -> Color {
    match color {
        game::Color::Red => Color::Red,
        game::Color::Blue => Color::Blue,
        game::Color::Yellow => Color::Yellow,
    }
}

/// Two-character glyph for one board cell.
pub fn cell_span(cell: Cell, x: usize, y: usize) -> Span<'static> {
    match cell {
        Cell::Empty => {
            if (x + y) % 2 == 0 {
                Span::styled("░░", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw("  ")
            }
        }
        Cell::Virus(color) => Span::styled(
            "><",
            Style::default()
                .fg(Color::Black)
                .bg(term_color(color))
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Pill { color, .. } => Span::styled("██", Style::default().fg(term_color(color))),
    }
}

fn render_board(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let board = snapshot.composited_board();

    let board_lines: Vec<Line> = board
        .rows()
        .iter()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, &cell)| cell_span(cell, x, y))
                .collect();
            Line::from(spans)
        })
        .collect();

    let board_widget = Paragraph::new(board_lines)
        .block(Block::default().borders(Borders::ALL).title("tpills"));

    f.render_widget(board_widget, area);
}

fn render_stats(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(1)])
        .split(area);

    let stats_text = vec![
        Line::from(vec![Span::styled("Level", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(snapshot.level.to_string())]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("Score", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(snapshot.score.to_string())]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("Virus", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(snapshot.virus_count.to_string())]),
        Line::from(vec![Span::raw(format!("{}ms", snapshot.drop_interval_ms))]),
    ];

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(stats_widget, chunks[0]);
}

fn render_next_pill(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let next = snapshot.next;
    let next_lines = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![
            Span::styled("██", Style::default().fg(term_color(next.color1))),
            Span::styled("██", Style::default().fg(term_color(next.color2))),
        ]),
    ];

    let next_widget = Paragraph::new(next_lines)
        .block(Block::default().borders(Borders::ALL).title("Next"))
        .alignment(Alignment::Center);

    f.render_widget(next_widget, chunks[0]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn render_overlay(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let popup_area = centered_rect(90, 40, area);
    f.render_widget(Clear, popup_area);

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .alignment(Alignment::Center);

    f.render_widget(widget, popup_area);
}

fn render_paused_overlay(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("PAUSED", Style::default().fg(Color::Yellow))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("SPACE to resume")]),
    ];
    render_overlay(f, area, "Pause", lines);
}

fn render_level_complete_overlay(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let lines = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("CLEAR!", Style::default().fg(Color::Green))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw(format!("Next: level {}", snapshot.level))]),
    ];
    render_overlay(f, area, "Level", lines);
}

fn render_game_over_overlay(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let lines = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("GAME OVER", Style::default().fg(Color::Red))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw(format!("Score: {}", snapshot.score))]),
        Line::from(vec![Span::raw(format!("Level: {}", snapshot.level))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("R restart")]),
        Line::from(vec![Span::raw("Q quit")]),
    ];
    render_overlay(f, area, "Finished", lines);
}
