//! Outdoor-activity suitability scoring.
//!
//! Starts every observation at 100 points and subtracts a fixed penalty for
//! each adverse factor (temperature band, thermal-feel gap, wind, rain,
//! snow). Each penalty appends one piece of advice, in that evaluation order.
//! The final score maps to a level: 70+ optimal, 40-69 caution, below 40
//! adverse.

use serde::Deserialize;

use crate::model::{SuitabilityLevel, SuitabilityVerdict, WeatherObservation};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Classifier thresholds. Temperatures in °C, wind in km/h, rain in mm/h.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuitabilityThresholds {
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub caution_min: f64,
    pub caution_max: f64,
    pub wind_caution: f64,
    pub wind_dangerous: f64,
    pub rain_light: f64,
    pub rain_heavy: f64,
}

impl Default for SuitabilityThresholds {
    fn default() -> Self {
        Self {
            optimal_min: 15.0,
            optimal_max: 25.0,
            caution_min: 8.0,
            caution_max: 32.0,
            wind_caution: 20.0,
            wind_dangerous: 40.0,
            rain_light: 2.0,
            rain_heavy: 7.6,
        }
    }
}

impl SuitabilityThresholds {
    /// Checks that the bands nest and ascend; overlapping bands would make
    /// the temperature/wind/rain checks skip a level.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.caution_min <= self.optimal_min
            && self.optimal_min <= self.optimal_max
            && self.optimal_max <= self.caution_max)
        {
            return Err(format!(
                "temperature bands must satisfy caution_min <= optimal_min <= optimal_max <= caution_max \
                 (got {} / {} / {} / {})",
                self.caution_min, self.optimal_min, self.optimal_max, self.caution_max
            ));
        }
        if !(self.wind_caution < self.wind_dangerous) {
            return Err(format!(
                "wind_caution ({}) must be below wind_dangerous ({})",
                self.wind_caution, self.wind_dangerous
            ));
        }
        if !(0.0 < self.rain_light && self.rain_light < self.rain_heavy) {
            return Err(format!(
                "rain thresholds must satisfy 0 < rain_light < rain_heavy (got {} / {})",
                self.rain_light, self.rain_heavy
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Advice texts
// ---------------------------------------------------------------------------

pub const ADVICE_NO_DATA: &str = "No hay datos meteorológicos disponibles para este municipio";
pub const ADVICE_PERFECT: &str = "✨ Condiciones perfectas para actividades al aire libre";

const ADVICE_COOL: &str = "🧥 Hace algo de frío, lleva una chaqueta o abrigo ligero";
const ADVICE_WARM: &str = "☀️ Hace calor, lleva agua y protección solar (gorra, crema)";
const ADVICE_VERY_COLD: &str = "❄️ Hace mucho frío, abrígate bien con varias capas de ropa";
const ADVICE_VERY_HOT: &str = "🌡️ Hace mucho calor, evita exposición prolongada al sol";
const ADVICE_FEELS_COLDER: &str =
    "🌬️ El viento hace que se sienta más frío de lo que indica la temperatura";
const ADVICE_FEELS_HOTTER: &str = "💧 La humedad hace que se sienta más calor del real";
const ADVICE_LIGHT_RAIN: &str = "🌦️ Lluvia ligera, lleva paraguas o impermeable";
const ADVICE_MODERATE_RAIN: &str = "☔ Lluvia moderada, mejor postponer actividades al aire libre";
const ADVICE_HEAVY_RAIN: &str = "⛈️ Lluvia fuerte, no es buen momento para salir";
const ADVICE_SNOW: &str = "🌨️ Está nevando, extrema precaución con superficies resbaladizas";

/// Feels-like gap (°C) beyond which the thermal-feel penalty applies.
const THERMAL_FEEL_GAP_C: f64 = 5.0;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Verdict returned when no observation could be fetched.
pub fn no_data_verdict() -> SuitabilityVerdict {
    let level = SuitabilityLevel::NoData;
    SuitabilityVerdict {
        level,
        score: 0,
        message: level.headline().to_string(),
        advice: vec![ADVICE_NO_DATA.to_string()],
        color: level.color().to_string(),
    }
}

/// Maps a clamped score to its level. Boundaries: 70 and 40 are inclusive
/// lower bounds of optimal and caution.
pub fn level_for_score(score: u8) -> SuitabilityLevel {
    if score >= 70 {
        SuitabilityLevel::Optimal
    } else if score >= 40 {
        SuitabilityLevel::Caution
    } else {
        SuitabilityLevel::Adverse
    }
}

/// Classifies an observation, or returns the no-data verdict for `None`.
pub fn classify(
    observation: Option<&WeatherObservation>,
    thresholds: &SuitabilityThresholds,
) -> SuitabilityVerdict {
    let Some(obs) = observation else {
        return no_data_verdict();
    };

    let t = thresholds;
    let temp = obs.temp_c;
    let wind = obs.wind_kmh();
    let rain = obs.rain_mm();
    let snow = obs.snow_mm();

    let mut score: i32 = 100;
    let mut advice: Vec<String> = Vec::new();

    // Temperature bands are mutually exclusive.
    if t.optimal_min <= temp && temp <= t.optimal_max {
        // comfortable
    } else if t.caution_min <= temp && temp < t.optimal_min {
        score -= 20;
        advice.push(ADVICE_COOL.to_string());
    } else if t.optimal_max < temp && temp <= t.caution_max {
        score -= 20;
        advice.push(ADVICE_WARM.to_string());
    } else if temp < t.caution_min {
        score -= 50;
        advice.push(ADVICE_VERY_COLD.to_string());
    } else {
        score -= 50;
        advice.push(ADVICE_VERY_HOT.to_string());
    }

    if (obs.feels_like_c - temp).abs() > THERMAL_FEEL_GAP_C {
        score -= 10;
        if obs.feels_like_c < temp {
            advice.push(ADVICE_FEELS_COLDER.to_string());
        } else {
            advice.push(ADVICE_FEELS_HOTTER.to_string());
        }
    }

    if wind < t.wind_caution {
        // calm or breeze
    } else if wind < t.wind_dangerous {
        score -= 25;
        advice.push(format!(
            "💨 Viento moderado ({} km/h), sujeta bien tus pertenencias",
            wind as i64
        ));
    } else {
        score -= 60;
        advice.push(format!(
            "⚠️ Viento fuerte ({} km/h), peligroso para actividades al aire libre",
            wind as i64
        ));
    }

    if rain <= 0.0 {
        // dry
    } else if rain < t.rain_light {
        score -= 20;
        advice.push(ADVICE_LIGHT_RAIN.to_string());
    } else if rain < t.rain_heavy {
        score -= 40;
        advice.push(ADVICE_MODERATE_RAIN.to_string());
    } else {
        score -= 70;
        advice.push(ADVICE_HEAVY_RAIN.to_string());
    }

    if snow > 0.0 {
        score -= 50;
        advice.push(ADVICE_SNOW.to_string());
    }

    let score = score.max(0) as u8;

    if advice.is_empty() {
        advice.push(ADVICE_PERFECT.to_string());
    }

    let level = level_for_score(score);
    SuitabilityVerdict {
        level,
        score,
        message: level.headline().to_string(),
        advice,
        color: level.color().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(temp: f64, feels_like: f64, wind_kmh: f64, rain: Option<f64>) -> WeatherObservation {
        WeatherObservation {
            temp_c: temp,
            feels_like_c: feels_like,
            humidity_pct: 55,
            wind_speed_ms: wind_kmh / 3.6,
            rain_1h_mm: rain,
            snow_1h_mm: None,
            description: "cielo claro".to_string(),
            icon: "01d".to_string(),
        }
    }

    fn verdict(o: &WeatherObservation) -> SuitabilityVerdict {
        classify(Some(o), &SuitabilityThresholds::default())
    }

    // --- Reference examples -------------------------------------------------

    #[test]
    fn test_mild_calm_dry_day_is_perfect() {
        let mut o = obs(20.0, 20.0, 0.0, None);
        o.wind_speed_ms = 2.78;
        let v = verdict(&o);
        assert_eq!(v.score, 100);
        assert_eq!(v.level, SuitabilityLevel::Optimal);
        assert_eq!(v.advice, vec![ADVICE_PERFECT.to_string()]);
        assert_eq!(v.color, "#10b981");
        assert_eq!(v.message, "Excelente para salir");
    }

    #[test]
    fn test_very_cold_day_drops_to_caution() {
        let v = verdict(&obs(5.0, 5.0, 5.0, Some(0.0)));
        assert_eq!(v.score, 50);
        assert_eq!(v.level, SuitabilityLevel::Caution);
        assert_eq!(v.advice, vec![ADVICE_VERY_COLD.to_string()]);
    }

    #[test]
    fn test_dangerous_wind_lands_exactly_on_caution_boundary() {
        let mut o = obs(20.0, 20.0, 0.0, None);
        o.wind_speed_ms = 13.9; // 50.04 km/h
        let v = verdict(&o);
        assert_eq!(v.score, 40);
        assert_eq!(v.level, SuitabilityLevel::Caution);
        assert_eq!(
            v.advice,
            vec!["⚠️ Viento fuerte (50 km/h), peligroso para actividades al aire libre".to_string()]
        );
    }

    #[test]
    fn test_heavy_rain_is_adverse() {
        let v = verdict(&obs(20.0, 20.0, 10.0, Some(10.0)));
        assert_eq!(v.score, 30);
        assert_eq!(v.level, SuitabilityLevel::Adverse);
        assert_eq!(v.color, "#ef4444");
        assert_eq!(v.advice, vec![ADVICE_HEAVY_RAIN.to_string()]);
    }

    // --- Temperature bands --------------------------------------------------

    #[test]
    fn test_temperature_band_edges() {
        let cases = [
            (15.0, 100, None),
            (25.0, 100, None),
            (8.0, 80, Some(ADVICE_COOL)),
            (14.9, 80, Some(ADVICE_COOL)),
            (25.1, 80, Some(ADVICE_WARM)),
            (32.0, 80, Some(ADVICE_WARM)),
            (7.9, 50, Some(ADVICE_VERY_COLD)),
            (32.1, 50, Some(ADVICE_VERY_HOT)),
        ];
        for (temp, expected_score, expected_advice) in cases {
            let v = verdict(&obs(temp, temp, 0.0, None));
            assert_eq!(v.score, expected_score, "score at {} °C", temp);
            match expected_advice {
                Some(text) => assert_eq!(v.advice, vec![text.to_string()], "advice at {} °C", temp),
                None => assert_eq!(v.advice, vec![ADVICE_PERFECT.to_string()]),
            }
        }
    }

    // --- Thermal feel -------------------------------------------------------

    #[test]
    fn test_feels_colder_adds_wind_chill_advice_after_temperature() {
        let v = verdict(&obs(10.0, 3.0, 0.0, None));
        assert_eq!(v.score, 70);
        assert_eq!(
            v.advice,
            vec![ADVICE_COOL.to_string(), ADVICE_FEELS_COLDER.to_string()]
        );
    }

    #[test]
    fn test_feels_hotter_adds_humidity_advice() {
        let v = verdict(&obs(20.0, 26.0, 0.0, None));
        assert_eq!(v.score, 90);
        assert_eq!(v.advice, vec![ADVICE_FEELS_HOTTER.to_string()]);
    }

    #[test]
    fn test_feel_gap_of_exactly_five_degrees_is_ignored() {
        let v = verdict(&obs(20.0, 15.0, 0.0, None));
        assert_eq!(v.score, 100);
    }

    // --- Wind ---------------------------------------------------------------

    #[test]
    fn test_moderate_wind_embeds_truncated_speed() {
        let v = verdict(&obs(20.0, 20.0, 27.9, None));
        assert_eq!(v.score, 75);
        assert_eq!(
            v.advice,
            vec!["💨 Viento moderado (27 km/h), sujeta bien tus pertenencias".to_string()]
        );
    }

    #[test]
    fn test_wind_exactly_at_caution_threshold_is_penalized() {
        let mut o = obs(20.0, 20.0, 0.0, None);
        o.wind_speed_ms = 20.0 / 3.6;
        let v = classify(
            Some(&o),
            &SuitabilityThresholds {
                wind_caution: o.wind_kmh(),
                ..SuitabilityThresholds::default()
            },
        );
        assert_eq!(v.score, 75);
    }

    // --- Rain and snow ------------------------------------------------------

    #[test]
    fn test_rain_bands() {
        let cases = [
            (0.0, 100),
            (0.5, 80),
            (2.0, 60),
            (7.5, 60),
            (7.6, 30),
        ];
        for (rain, expected) in cases {
            let v = verdict(&obs(20.0, 20.0, 0.0, Some(rain)));
            assert_eq!(v.score, expected, "score with {} mm/h", rain);
        }
    }

    #[test]
    fn test_snow_penalty_stacks_with_cold() {
        let mut o = obs(-2.0, -2.0, 0.0, None);
        o.snow_1h_mm = Some(0.4);
        let v = verdict(&o);
        assert_eq!(v.score, 0);
        assert_eq!(v.level, SuitabilityLevel::Adverse);
        assert_eq!(
            v.advice,
            vec![ADVICE_VERY_COLD.to_string(), ADVICE_SNOW.to_string()]
        );
    }

    #[test]
    fn test_score_is_clamped_at_zero() {
        let mut o = obs(40.0, 48.0, 60.0, Some(12.0));
        o.snow_1h_mm = Some(1.0);
        let v = verdict(&o);
        assert_eq!(v.score, 0);
        assert_eq!(v.advice.len(), 5, "every fired check adds one piece of advice");
    }

    // --- Levels and no-data -------------------------------------------------

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_score(39), SuitabilityLevel::Adverse);
        assert_eq!(level_for_score(40), SuitabilityLevel::Caution);
        assert_eq!(level_for_score(69), SuitabilityLevel::Caution);
        assert_eq!(level_for_score(70), SuitabilityLevel::Optimal);
        assert_eq!(level_for_score(0), SuitabilityLevel::Adverse);
        assert_eq!(level_for_score(100), SuitabilityLevel::Optimal);
    }

    #[test]
    fn test_missing_observation_yields_no_data_verdict() {
        let v = classify(None, &SuitabilityThresholds::default());
        assert_eq!(v, no_data_verdict());
        assert_eq!(v.level, SuitabilityLevel::NoData);
        assert_eq!(v.score, 0);
        assert_eq!(v.color, "#9ca3af");
        assert_eq!(v.advice, vec![ADVICE_NO_DATA.to_string()]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let o = obs(11.0, 4.0, 33.0, Some(3.0));
        assert_eq!(verdict(&o), verdict(&o));
    }

    #[test]
    fn test_custom_thresholds_shift_bands() {
        let strict = SuitabilityThresholds {
            optimal_min: 18.0,
            optimal_max: 22.0,
            ..SuitabilityThresholds::default()
        };
        let v = classify(Some(&obs(16.0, 16.0, 0.0, None)), &strict);
        assert_eq!(v.score, 80);
        assert_eq!(v.advice, vec![ADVICE_COOL.to_string()]);
    }

    // --- Threshold validation -----------------------------------------------

    #[test]
    fn test_default_thresholds_are_valid() {
        assert!(SuitabilityThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_wind_thresholds_are_rejected() {
        let t = SuitabilityThresholds {
            wind_caution: 50.0,
            ..SuitabilityThresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_overlapping_temperature_bands_are_rejected() {
        let t = SuitabilityThresholds {
            caution_min: 20.0,
            ..SuitabilityThresholds::default()
        };
        let err = t.validate().unwrap_err();
        assert!(err.contains("temperature bands"), "unexpected message: {}", err);
    }
}
