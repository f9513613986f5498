use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::app::Field;

/// Vue en lecture seule de l'état, construite par la boucle d'app à
/// chaque frame.
pub struct DrawContext<'a> {
    pub text: &'a str,
    pub morse: &'a str,
    pub focus: Field,
    pub text_cursor: usize,
    pub morse_cursor: usize,
    pub playing: bool,
    pub progress: Option<(usize, usize)>,
    pub audio_ready: bool,
    pub dot_secs: f64,
    pub tone_hz: f32,
    pub show_help: bool,
}

/// Draw the full UI: status line, both fields, playback line, footer.
pub fn draw(frame: &mut Frame, ctx: &DrawContext) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // état
        Constraint::Length(3), // champ texte
        Constraint::Length(3), // champ Morse
        Constraint::Length(1), // progression ou résumé config
        Constraint::Min(0),
        Constraint::Length(1), // raccourcis
    ])
    .split(area);

    draw_status(frame, chunks[0], ctx);
    draw_field(
        frame,
        chunks[1],
        " Text ",
        ctx.text,
        ctx.text_cursor,
        ctx.focus == Field::Text,
        ctx.playing,
    );
    draw_field(
        frame,
        chunks[2],
        " Morse ",
        ctx.morse,
        ctx.morse_cursor,
        ctx.focus == Field::Morse,
        ctx.playing,
    );
    draw_playback_line(frame, chunks[3], ctx);
    draw_footer(frame, chunks[5]);

    if ctx.show_help {
        draw_help_overlay(frame, area);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    let (label, style) = if !ctx.audio_ready {
        ("⚠ NO AUDIO", Style::default().fg(Color::Yellow))
    } else if ctx.playing {
        ("▶ PLAYING", Style::default().fg(Color::Green))
    } else {
        ("■ IDLE", Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        Span::styled(" ditdah ", Style::default().fg(Color::Cyan)),
        Span::raw("· "),
        Span::styled(label, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Champ d'une ligne avec fenêtre de défilement horizontale : le curseur
/// reste toujours visible dans la largeur intérieure du cadre.
fn draw_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    content: &str,
    cursor: usize,
    focused: bool,
    locked: bool,
) {
    let border_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);
    let inner = block.inner(area);

    let width = usize::from(inner.width.max(1));
    let chars: Vec<char> = content.chars().collect();
    let cursor = cursor.min(chars.len());
    let start = if cursor >= width { cursor + 1 - width } else { 0 };
    let end = (start + width).min(chars.len());
    let visible: String = chars[start..end].iter().collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);

    if focused && !locked {
        let x = inner.x + u16::try_from(cursor - start).unwrap_or(0);
        frame.set_cursor_position((x, inner.y));
    }
}

fn draw_playback_line(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    if let (true, Some((cursor, total))) = (ctx.playing, ctx.progress) {
        let ratio = if total == 0 {
            0.0
        } else {
            cursor as f64 / total as f64
        };
        let gauge = Gauge::default()
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{cursor}/{total}"))
            .gauge_style(Style::default().fg(Color::Green));
        frame.render_widget(gauge, area);
    } else {
        let summary = format!(
            " dot {:.0} ms · tone {:.0} Hz",
            ctx.dot_secs * 1000.0,
            ctx.tone_hz
        );
        frame.render_widget(
            Paragraph::new(summary).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Line::from(Span::styled(
        " Tab switch · Enter play/stop · F1 help · Esc quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(footer), area);
}

/// Draw a centered help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " ditdah — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" Tab       Switch field"),
        Line::from(" ←/→       Move cursor"),
        Line::from(" Home/End  Jump to edge"),
        Line::from(" Bksp/Del  Edit"),
        Line::from(" Ctrl+U    Clear field"),
        Line::from(" Enter     Play/Stop"),
        Line::from(" F1        Toggle help"),
        Line::from(" Esc       Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press F1 or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 30u16;
    let help_height = help_text.len() as u16 + 2;
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(
        x,
        y,
        help_width.min(area.width),
        help_height.min(area.height),
    );

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(help, help_area);
}
