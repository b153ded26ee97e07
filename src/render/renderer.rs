use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::collections::HashMap;

use crate::game::{FoodKind, GameEngine, GameState, ModeSettings, Phase, Position, PowerupKind};
use crate::metrics::{GameMetrics, format_duration};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R: Rng>(&self, frame: &mut Frame, engine: &GameEngine<R>, metrics: &GameMetrics) {
        let state = engine.state();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        let grid = self.render_grid(state, engine.mode_settings());
        frame.render_widget(grid, chunks[1]);

        match state.phase {
            Phase::Playing => {}
            Phase::Paused => {
                let area = centered(chunks[1], 30, 5);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_paused(), area);
            }
            Phase::GameOver(_) => {
                let area = centered(chunks[1], 40, 9);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(state), area);
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState, mode: &ModeSettings) -> Paragraph<'_> {
        let mut cells: HashMap<Position, Span> = HashMap::new();

        for obstacle in &state.obstacles {
            cells.insert(
                obstacle.position,
                Span::styled("██", Style::default().fg(Color::Gray)),
            );
        }

        for food in &state.foods {
            let (glyph, color) = match food.kind() {
                FoodKind::Apple => ("● ", Color::Red),
                FoodKind::Bonus => ("◆ ", Color::Yellow),
                FoodKind::Power(kind) => ("★ ", powerup_color(kind)),
            };
            let mut style = Style::default().fg(color);
            if food.pulse() > 0.5 {
                style = style.add_modifier(Modifier::BOLD);
            }
            cells.insert(food.position(), Span::styled(glyph, style));
        }

        // Drawn from the eased positions, tail first so the head wins overlaps
        let ghost = state.powerups.is_active(PowerupKind::Ghost);
        let body_color = if ghost { Color::DarkGray } else { Color::Green };
        for (i, segment) in state.snake.segments().iter().enumerate().rev() {
            let cell = segment.position().rounded();
            if !state.grid.contains(cell) {
                continue;
            }
            let span = if i == 0 {
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("□ ", Style::default().fg(body_color))
            };
            cells.insert(cell, span);
        }

        let lines: Vec<Line> = (0..state.grid.height)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid.width)
                    .map(|x| {
                        cells.remove(&Position::new(x, y)).unwrap_or_else(|| {
                            Span::styled(". ", Style::default().fg(Color::DarkGray))
                        })
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" Snake: {} ", mode.name))
                    .title_bottom(format!(" {} ", mode.description)),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<R: Rng>(&self, engine: &GameEngine<R>, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let (time_label, time) = match engine.time_remaining() {
            Some(left) => ("Left: ", format_duration(left)),
            None => ("Time: ", metrics.format_time()),
        };

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(engine.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(engine.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled(time_label, label),
            Span::styled(time, value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.1}", engine.state().snake.speed()), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ];

        for (kind, left) in engine.active_powerups().iter_active() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {:.1}s", kind.name(), left.as_secs_f32()),
                Style::default().fg(powerup_color(kind)),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("P to resume", Style::default().fg(Color::Gray))),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let cause = state
            .game_over_cause()
            .map(|cause| cause.to_string())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" mode | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn powerup_color(kind: PowerupKind) -> Color {
    match kind {
        PowerupKind::Speed => Color::Magenta,
        PowerupKind::Slow => Color::Blue,
        PowerupKind::Shrink => Color::LightRed,
        PowerupKind::Ghost => Color::White,
    }
}

/// A `width` x `height` box in the middle of `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen<R: Rng>(engine: &GameEngine<R>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| renderer.render(frame, engine, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_hud_and_snake() {
        let engine = GameEngine::with_rng(GameConfig::small(), StdRng::seed_from_u64(1));
        let text = screen(&engine);

        assert!(text.contains("Score"));
        assert!(text.contains("Classic"));
        assert!(text.contains("Classic snake gameplay."));
        assert!(text.contains('■'));
        assert!(text.contains('●'));
    }

    #[test]
    fn test_renders_overlays() {
        let mut engine = GameEngine::with_rng(GameConfig::small(), StdRng::seed_from_u64(1));
        engine.handle_pause_toggle();
        assert!(screen(&engine).contains("PAUSED"));

        engine.handle_pause_toggle();
        engine.set_mode(crate::game::ModeId::TimeTrial);
        engine.update(std::time::Duration::from_secs(61));
        let text = screen(&engine);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("time up"));
    }

    #[test]
    fn test_centered_is_clipped() {
        let area = Rect::new(0, 0, 20, 4);
        assert_eq!(centered(area, 30, 2), Rect::new(0, 1, 20, 2));
    }
}
