//! Best-effort public ratings fetch.
//!
//! One GET against the public profile endpoint, no retries. The failure path
//! is an explicit [`RatingsError`] so callers (and tests) can see why the
//! panel stayed hidden; the user never does.

use serde::Deserialize;
use thiserror::Error;

#[cfg(test)]
#[path = "ratings_tests.rs"]
mod ratings_tests;

const PROFILE_ENDPOINT: &str = "https://lichess.org/api/user";

#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("network error: {0}")]
    Network(String),
    #[error("profile endpoint answered {0}")]
    Status(u16),
    #[error("malformed profile body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Up to three public ratings. Perfs the profile does not carry stay `None`
/// and are simply not shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRatings {
    pub bullet: Option<u32>,
    pub blitz: Option<u32>,
    pub rapid: Option<u32>,
}

impl PlayerRatings {
    pub fn is_empty(&self) -> bool {
        self.bullet.is_none() && self.blitz.is_none() && self.rapid.is_none()
    }

    /// Label/value pairs in display order, present perfs only.
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        [
            ("Bullet", self.bullet),
            ("Blitz", self.blitz),
            ("Rapid", self.rapid),
        ]
        .into_iter()
        .filter_map(|(label, rating)| rating.map(|r| (label, r)))
        .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    #[serde(default)]
    perfs: Perfs,
}

#[derive(Debug, Default, Deserialize)]
struct Perfs {
    bullet: Option<Perf>,
    blitz: Option<Perf>,
    rapid: Option<Perf>,
}

#[derive(Debug, Deserialize)]
struct Perf {
    rating: Option<u32>,
}

/// Parse a profile body. Split from the fetch so the JSON path tests offline.
pub fn parse_ratings(body: &str) -> Result<PlayerRatings, RatingsError> {
    let profile: Profile = serde_json::from_str(body)?;
    Ok(PlayerRatings {
        bullet: profile.perfs.bullet.and_then(|p| p.rating),
        blitz: profile.perfs.blitz.and_then(|p| p.rating),
        rapid: profile.perfs.rapid.and_then(|p| p.rating),
    })
}

/// Fetch the public ratings for `user`. One attempt, any failure reported.
pub fn fetch_ratings(user: &str) -> Result<PlayerRatings, RatingsError> {
    let url = format!("{PROFILE_ENDPOINT}/{user}");
    let response = match ureq::get(&url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => return Err(RatingsError::Status(code)),
        Err(err) => return Err(RatingsError::Network(err.to_string())),
    };
    let body = response
        .into_string()
        .map_err(|err| RatingsError::Network(err.to_string()))?;
    parse_ratings(&body)
}
