//! Maps the provider payload onto [`WeatherSnapshot`].
//!
//! Every series is zipped index for index with its time labels. A length
//! mismatch anywhere is a [`WeatherError::MalformedPayload`]; values are
//! never silently dropped to fit the shorter array.

use crate::{
    error::WeatherError,
    model::{CurrentConditions, DailyPoint, Forecast, HourlyPoint, Location, WeatherSnapshot},
    provider::{RawCurrent, RawDaily, RawHourly, RawPayload},
};

pub fn normalize(location: Location, raw: RawPayload) -> Result<WeatherSnapshot, WeatherError> {
    let daily = daily_points(raw.daily)?;
    let hourly = hourly_points(raw.hourly)?;

    Ok(WeatherSnapshot {
        location,
        current: current_conditions(raw.current),
        forecast: Forecast { daily, hourly },
    })
}

fn current_conditions(c: RawCurrent) -> CurrentConditions {
    CurrentConditions {
        temp: c.temperature_2m,
        humidity: c.relative_humidity_2m,
        wind_speed: c.wind_speed_10m,
        weather_code: c.weather_code,
        pressure: c.surface_pressure,
        feels_like: c.apparent_temperature,
        uv: c.uv_index,
    }
}

fn check_len(series: &str, field: &str, expected: usize, actual: usize) -> Result<(), WeatherError> {
    if expected == actual {
        return Ok(());
    }
    Err(WeatherError::MalformedPayload(format!(
        "{series}.{field} has {actual} values but {series}.time has {expected}"
    )))
}

fn daily_points(d: RawDaily) -> Result<Vec<DailyPoint>, WeatherError> {
    let len = d.time.len();
    check_len("daily", "weathercode", len, d.weathercode.len())?;
    check_len("daily", "temperature_2m_max", len, d.temperature_2m_max.len())?;
    check_len("daily", "temperature_2m_min", len, d.temperature_2m_min.len())?;

    Ok(d.time
        .into_iter()
        .zip(d.temperature_2m_max)
        .zip(d.temperature_2m_min)
        .zip(d.weathercode)
        .map(|(((date, temp_max), temp_min), weather_code)| DailyPoint {
            date,
            temp_max,
            temp_min,
            weather_code,
        })
        .collect())
}

fn hourly_points(h: RawHourly) -> Result<Vec<HourlyPoint>, WeatherError> {
    let len = h.time.len();
    check_len("hourly", "temperature_2m", len, h.temperature_2m.len())?;
    check_len("hourly", "weathercode", len, h.weathercode.len())?;

    Ok(h.time
        .into_iter()
        .zip(h.temperature_2m)
        .zip(h.weathercode)
        .map(|((time, temp), weather_code)| HourlyPoint {
            time,
            temp,
            weather_code,
        })
        .collect())
}
