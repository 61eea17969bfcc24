use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::theme::ThemeBundle;
use crate::app::App;

/// Render the vertical feed list: one entry per post with author,
/// content, image URLs and the like/comment line.
pub fn render_feed(frame: &mut Frame, app: &mut App, theme: &ThemeBundle, area: Rect) {
    let content_width = area.width.saturating_sub(4).max(20) as usize;

    let items: Vec<ListItem> = app
        .feed
        .posts
        .iter()
        .map(|post| {
            let like = app.feed.likes.get(&post.id).copied().unwrap_or_default();
            let comment_count = app.feed.comment_count(post.id);

            let mut lines = vec![Line::from(Span::styled(
                post.user_name.clone(),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ))];

            for url in &post.image_urls {
                lines.push(Line::from(Span::styled(
                    format!("  ▫ {}", url),
                    Style::default().fg(theme.border),
                )));
            }

            let heart = if like.liked { "♥" } else { "♡" };
            lines.push(Line::from(Span::styled(
                format!("  {} {}   comments: {}", heart, like.count, comment_count),
                Style::default().fg(theme.text),
            )));

            for wrapped in textwrap::wrap(&post.content, content_width) {
                lines.push(Line::from(Span::styled(
                    wrapped.into_owned(),
                    Style::default().fg(theme.text),
                )));
            }

            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Glimpse ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.button_bg)
                .fg(theme.button_text),
        );

    frame.render_stateful_widget(list, area, &mut app.feed.list_state);
}
