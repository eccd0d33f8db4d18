use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;
use crate::error::{RouletteError, RouletteResult};
use crate::models::companion::Companion;
use crate::models::restaurant::Restaurant;

const PRODUCT_ID: &str = "-//lunch-roulette//lunch-roulette-backend//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Fixed lunch slot, interpreted in the user's UTC offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LunchSlot {
    pub start: Time,
    pub duration: Duration,
    pub utc_offset: UtcOffset,
}

impl LunchSlot {
    /// Start and end of the slot on the local calendar day of `now`.
    pub fn on_day_of(&self, now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
        let date = now.to_offset(self.utc_offset).date();
        let start = PrimitiveDateTime::new(date, self.start).assume_offset(self.utc_offset);
        (start, start + self.duration)
    }
}

/// Invitee written as the event's ATTENDEE. Only built from a checked address.
#[derive(Clone, Debug, PartialEq)]
pub struct Attendee {
    email: String,
}

impl Attendee {
    /// Blank input means no attendee. Anything that could break out of the
    /// `mailto:` value (control characters, separators, quotes) is rejected.
    pub fn from_email(raw: &str) -> RouletteResult<Option<Self>> {
        let email = raw.trim();
        if email.is_empty() {
            return Ok(None);
        }

        let forbidden = |c: char| {
            c.is_control()
                || c.is_whitespace()
                || matches!(c, ';' | ':' | ',' | '"' | '<' | '>' | '\\')
        };
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(forbidden)
            }
            None => false,
        };
        if !valid {
            return Err(RouletteError::InvalidAttendeeEmail(email.to_string()));
        }
        Ok(Some(Self { email: email.to_string() }))
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub stamp: OffsetDateTime,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub attendee: Option<Attendee>,
}

impl CalendarEvent {
    pub fn for_restaurant(
        restaurant: &Restaurant,
        companion: Option<&Companion>,
        attendee: Option<Attendee>,
        slot: &LunchSlot,
        now: OffsetDateTime,
    ) -> Self {
        let (start, end) = slot.on_day_of(now);

        let mut description = vec![format!(
            "About {} min walk ({} m)",
            restaurant.travel_minutes, restaurant.distance_m
        )];
        if let Some(rating) = restaurant.rating {
            description.push(format!("Rating: {:.1} / 5.0", rating));
        }
        if let Some(uri) = &restaurant.google_maps_uri {
            description.push(format!("Map: {}", uri));
        }
        if let Some(companion) = companion {
            description.push(format!("With: {} ({})", companion.name, companion.country));
        }

        Self {
            uid: format!("{}@lunch-roulette", Uuid::new_v4()),
            stamp: now,
            start,
            end,
            summary: format!("Lunch: {}", restaurant.name),
            location: restaurant.address.clone(),
            description: description.join("\n"),
            attendee,
        }
    }

    pub fn file_name(&self) -> String {
        let date = self.start.date();
        format!("lunch-{}-{:02}-{:02}.ics", date.year(), u8::from(date.month()), date.day())
    }

    pub fn to_ics(&self) -> anyhow::Result<String> {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODUCT_ID),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", format_utc(self.stamp)?),
            format!("DTSTART:{}", format_utc(self.start)?),
            format!("DTEND:{}", format_utc(self.end)?),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("LOCATION:{}", escape_text(&self.location)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
        ];
        if let Some(attendee) = &self.attendee {
            lines.push(format!("ATTENDEE;ROLE=REQ-PARTICIPANT;RSVP=TRUE:mailto:{}", attendee.email));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut ics = String::new();
        for line in lines {
            ics.push_str(&fold_line(&line));
            ics.push_str("\r\n");
        }
        Ok(ics)
    }
}

fn format_utc(at: OffsetDateTime) -> anyhow::Result<String> {
    let format = format_description!("[year][month][day]T[hour][minute][second]Z");
    Ok(at.to_offset(UtcOffset::UTC).format(format)?)
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Folds a content line at 75 octets without splitting UTF-8 sequences.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0;
    for c in line.chars() {
        // continuation lines start with a space that counts toward the limit
        if current + c.len_utf8() > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            current = 1;
        }
        folded.push(c);
        current += c.len_utf8();
    }
    folded
}
