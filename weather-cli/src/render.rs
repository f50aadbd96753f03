//! Human-readable output. Unit conversion and icon URLs happen here, never in the core.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;
use weather_core::{IconId, TempUnit, UserPreferences, WeatherSnapshot, describe, icon_id};

const ICON_CDN: &str = "https://cdn.weatherapi.com/weather/128x128";

pub fn icon_url(icon: IconId) -> String {
    let time_of_day = if icon.night { "night" } else { "day" };
    format!("{ICON_CDN}/{time_of_day}/{}.png", icon.code)
}

pub fn temperature(celsius: f64, unit: TempUnit) -> String {
    format!("{}°{unit}", unit.from_celsius(celsius).round() as i64)
}

fn hour_label(time: &str) -> String {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| time.to_string())
}

fn day_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a %d %b").to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn place(snapshot: &WeatherSnapshot) -> String {
    let loc = &snapshot.location;
    if loc.country.is_empty() {
        loc.name.clone()
    } else {
        format!("{}, {}", loc.name, loc.country)
    }
}

pub fn snapshot(snapshot: &WeatherSnapshot, prefs: &UserPreferences, hours: usize, is_night: bool) -> String {
    let unit = prefs.temp_unit;
    let current = &snapshot.current;
    let mut out = String::new();

    let star = if prefs.is_favorite(&snapshot.location.name) { " ★" } else { "" };
    let _ = writeln!(out, "{}{star}", place(snapshot));
    let _ = writeln!(
        out,
        "  {} {}  (feels like {})",
        temperature(current.temp, unit),
        describe(current.weather_code),
        temperature(current.feels_like, unit),
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {} km/h  Pressure {} hPa  UV {:.1}",
        current.humidity.round(),
        current.wind_speed.round(),
        current.pressure.round(),
        current.uv,
    );
    let _ = writeln!(out, "  Icon {}", icon_url(icon_id(current.weather_code, is_night)));

    let hourly = snapshot.forecast.hourly_window(hours);
    if !hourly.is_empty() {
        let _ = writeln!(out, "\nNext {} hours", hourly.len());
        for point in hourly {
            let _ = writeln!(
                out,
                "  {}  {:>6}  {}",
                hour_label(&point.time),
                temperature(point.temp, unit),
                describe(point.weather_code),
            );
        }
    }

    if !snapshot.forecast.daily.is_empty() {
        let _ = writeln!(out, "\nDaily");
        for day in &snapshot.forecast.daily {
            let _ = writeln!(
                out,
                "  {}  {:>6} / {:<6}  {}",
                day_label(&day.date),
                temperature(day.temp_max, unit),
                temperature(day.temp_min, unit),
                describe(day.weather_code),
            );
        }
    }

    out
}

pub fn share_text(snapshot: &WeatherSnapshot, unit: TempUnit) -> String {
    let loc = &snapshot.location;
    let mut text = format!("Current weather in {}: {}", loc.name, temperature(snapshot.current.temp, unit));
    if !loc.country.is_empty() {
        let _ = write!(text, " - {}", loc.country);
    }
    text
}
