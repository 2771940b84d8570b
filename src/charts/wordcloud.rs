//! Word cloud of the sampled review texts.
//!
//! Word frequencies are laid out along an Archimedean spiral from the
//! canvas centre; each word takes the first spot where its bounding box
//! fits inside the canvas without touching an already placed word.

use crate::analysis::ScoredReview;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Cloud canvas size, excluding the title strip.
pub const CANVAS: (u32, u32) = (800, 400);

const TITLE_HEIGHT: u32 = 50;

/// Maximum number of words drawn.
pub const MAX_WORDS: usize = 100;

const MAX_FONT: f64 = 90.0;
const MIN_FONT: f64 = 10.0;

const SPIRAL_STEP: f64 = 0.35;
const SPIRAL_TRIES: usize = 4000;

/// Splits text into lowercase word tokens of at least two characters.
///
/// Apostrophes inside words are kept ("don't") and a trailing possessive
/// "'s" is dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .map(|t| t.strip_suffix("'s").map(String::from).unwrap_or(t))
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// Counts words across all texts, skipping stopwords and pure numbers.
///
/// Returns at most `limit` words, most frequent first (ties alphabetical).
pub fn frequencies<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    stopwords: &HashSet<String>,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for token in tokenize(text) {
            if stopwords.contains(&token) || token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut words: Vec<_> = counts.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words
}

/// A word placed on the canvas. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub rank: usize,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        self.x < other.x + other.width as i32
            && other.x < self.x + self.width as i32
            && self.y < other.y + other.height as i32
            && other.y < self.y + self.height as i32
    }
}

fn font_size(count: usize, max_count: usize) -> f64 {
    // Half linear, half rank-flat, like a relative scaling of 0.5.
    let ratio = count as f64 / max_count.max(1) as f64;
    MIN_FONT + (MAX_FONT - MIN_FONT) * (0.5 * ratio + 0.5 * ratio.sqrt()) * 0.8
}

/// Places words on a `canvas`-sized area, largest first.
///
/// `measure` returns the pixel size of a word rendered at a font size. Words
/// that cannot fit even at the minimum font size are dropped.
pub fn layout<M>(words: &[(String, usize)], canvas: (u32, u32), measure: M) -> Vec<PlacedWord>
where
    M: Fn(&str, u32) -> (u32, u32),
{
    let max_count = words.first().map(|(_, c)| *c).unwrap_or(0);
    let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
    let mut placed: Vec<PlacedWord> = Vec::new();

    for (rank, (word, count)) in words.iter().enumerate() {
        let mut font = font_size(*count, max_count);

        let spot = loop {
            let size = font.round() as u32;
            let (width, height) = measure(word, size);
            let bounds = (width.max(1), height.max(1));
            if let Some(spot) = find_spot(word, size, bounds, rank, &placed, (cw, ch)) {
                break Some(spot);
            }
            if font <= MIN_FONT {
                break None;
            }
            font = (font * 0.8).max(MIN_FONT);
        };

        match spot {
            Some(word) => placed.push(word),
            None => debug!("No room for '{}' in word cloud", word),
        }
    }

    placed
}

fn find_spot(
    word: &str,
    font_size: u32,
    (width, height): (u32, u32),
    rank: usize,
    placed: &[PlacedWord],
    (cw, ch): (f64, f64),
) -> Option<PlacedWord> {
    if width as f64 > cw || height as f64 > ch {
        return None;
    }

    // Stretch the spiral horizontally to match the canvas aspect ratio.
    let aspect = cw / ch;

    (0..SPIRAL_TRIES).find_map(|i| {
        let t = i as f64 * SPIRAL_STEP;
        let cx = cw / 2.0 + aspect * t * t.cos();
        let cy = ch / 2.0 + t * t.sin();

        let x = (cx - width as f64 / 2.0).round() as i32;
        let y = (cy - height as f64 / 2.0).round() as i32;

        if x < 0 || y < 0 || x as f64 + width as f64 > cw || y as f64 + height as f64 > ch {
            return None;
        }

        let candidate = PlacedWord { word: word.to_string(), font_size, x, y, width, height, rank };

        (!placed.iter().any(|p| p.overlaps(&candidate))).then_some(candidate)
    })
}

fn word_style(font_size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", font_size as f64).into_font())
}

/// Rough text box used when the backend cannot measure a font.
fn fallback_size(word: &str, font_size: u32) -> (u32, u32) {
    let font = font_size as f64;
    ((word.chars().count() as f64 * font * 0.75).ceil() as u32, (font * 1.2).ceil() as u32)
}

/// Samples the coolwarm colormap at `t` in [0, 1].
fn coolwarm(t: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 { (COOL, MID, t * 2.0) } else { (MID, WARM, (t - 0.5) * 2.0) };
    let lerp = |a: f64, b: f64| (a + (b - a) * local).round() as u8;

    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Spreads colors across the map by rank with a fixed stride, so neighbours differ.
fn word_color(rank: usize) -> RGBColor {
    coolwarm(((rank * 37) % 101) as f64 / 100.0)
}

/// Renders the word cloud to a PNG file.
pub fn render(records: &[ScoredReview], stopwords: &HashSet<String>, path: &Path) -> Result<()> {
    let text = records.iter().map(|r| r.review.as_str()).collect::<Vec<_>>().join(" ");
    let words = frequencies([text.as_str()], stopwords, MAX_WORDS);

    let root = BitMapBackend::new(path, (CANVAS.0, CANVAS.1 + TITLE_HEIGHT)).into_drawing_area();
    let (title_area, cloud) = root.split_vertically(TITLE_HEIGHT);

    let placed = layout(&words, CANVAS, |word, size| {
        cloud
            .estimate_text_size(word, &word_style(size))
            .unwrap_or_else(|_| fallback_size(word, size))
    });
    debug!("Word cloud: {} of {} words placed", placed.len(), words.len());

    title_area.fill(&WHITE)?;
    title_area.draw(&Text::new(
        "Most Frequently Used Words in Reviews",
        (CANVAS.0 as i32 / 2, TITLE_HEIGHT as i32 / 2),
        TextStyle::from(("sans-serif", 22).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    cloud.fill(&BLACK)?;
    for word in &placed {
        let color = word_color(word.rank);
        let style = word_style(word.font_size).color(&color);
        cloud.draw(&Text::new(word.word.as_str(), (word.x, word.y), style))?;
    }

    root.present().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
