//! Screen layout
//!
//! Fixed landscape layout: up to two person columns (face glyph above the
//! name), then the clock and the date spanning the lower half.

use core::fmt::Write;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};
use profont::{PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

/// Maximum person columns on screen
pub const MAX_TILES: usize = 2;

/// Maximum name length rendered under a face
pub const NAME_LEN: usize = 16;

/// Left edge of each person column
const COLUMN_X: [i32; MAX_TILES] = [10, 140];

const FACE_Y: i32 = 5;
const NAME_Y: i32 = 40;
const CLOCK_POS: Point = Point::new(10, 60);
const DATE_POS: Point = Point::new(10, 100);

const FACE_FONT: &MonoFont<'static> = &PROFONT_18_POINT;
const NAME_FONT: &MonoFont<'static> = &PROFONT_12_POINT;
const CLOCK_FONT: &MonoFont<'static> = &PROFONT_24_POINT;
const DATE_FONT: &MonoFont<'static> = &PROFONT_14_POINT;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One person column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Face glyph (may be empty when the person is away)
    pub face: &'static str,
    /// Display name
    pub name: String<NAME_LEN>,
}

impl Tile {
    /// Create a tile, truncating the name to `NAME_LEN`
    pub fn new(face: &'static str, name: &str) -> Self {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self { face, name: label }
    }
}

/// Everything drawn in one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Person columns, left to right
    pub tiles: Vec<Tile, MAX_TILES>,
    /// Wall time shown by the clock and date
    pub time: NaiveDateTime,
}

impl Frame {
    /// Create an empty frame for the given wall time
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            tiles: Vec::new(),
            time,
        }
    }

    /// Add a column; extra columns beyond `MAX_TILES` are dropped
    pub fn push(&mut self, tile: Tile) {
        if self.tiles.push(tile).is_err() {
            log::warn!("Frame has no room for another column");
        }
    }

    /// Clock text, `HH:MM`
    pub fn clock_text(&self) -> String<8> {
        let mut s = String::new();
        let _ = write!(s, "{:02}:{:02}", self.time.hour(), self.time.minute());
        s
    }

    /// Date text, e.g. `Monday 05 January`
    pub fn date_text(&self) -> String<32> {
        let mut s = String::new();
        let month = MONTHS[self.time.month0() as usize];
        let _ = write!(
            s,
            "{} {:02} {}",
            weekday_name(self.time.weekday()),
            self.time.day(),
            month
        );
        s
    }

    /// Draw the frame onto any monochrome target
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        for (tile, x) in self.tiles.iter().zip(COLUMN_X) {
            if !tile.face.is_empty() {
                text(tile.face, Point::new(x, FACE_Y), FACE_FONT, target)?;
            }
            text(tile.name.as_str(), Point::new(x, NAME_Y), NAME_FONT, target)?;
        }

        text(self.clock_text().as_str(), CLOCK_POS, CLOCK_FONT, target)?;
        text(self.date_text().as_str(), DATE_POS, DATE_FONT, target)?;
        Ok(())
    }
}

fn text<D>(s: &str, at: Point, font: &MonoFont<'_>, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, BinaryColor::On);
    Text::with_baseline(s, at, style, Baseline::Top)
        .draw(target)
        .map(|_| ())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
