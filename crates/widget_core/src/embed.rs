//! Embed URL for the featured pre-recorded game.

/// Viewer URL for a public game id, matching the site's theme.
pub fn featured_game_url(game_id: &str) -> String {
    format!("https://lichess.org/embed/game/{game_id}?theme=auto&bg=auto")
}
