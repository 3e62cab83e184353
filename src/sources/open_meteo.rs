//! Open-Meteo adapters: current weather, daily outlooks, marine, air quality,
//! precipitation-derived flood risk and solar radiation.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, instrument};

use super::http::UpstreamClient;
use super::{FetchResult, SourceError, WeatherSource};
use crate::config::SourcesConfig;
use crate::models::conditions::format_radiation;
use crate::models::weather::weather_code_to_description;
use crate::models::{
    AirQuality, AqiSample, Coordinate, CurrentWeather, DayOutlook, FloodReading, MarineConditions,
    SolarRadiation, UvSample, WaveSample,
};

const DAILY_OUTLOOK: &str = "temperature_2m_max,temperature_2m_min,weathercode";
const MARINE_CURRENT: &str = "wave_height,wave_direction,wave_period,wind_wave_height,wind_wave_direction,wind_wave_period,swell_wave_height,swell_wave_direction,swell_wave_period";
const MARINE_HOURLY: &str = "wave_height,wave_direction,wave_period";
const AIR_QUALITY_CURRENT: &str = "european_aqi,us_aqi,european_aqi_pm2_5,european_aqi_pm10,us_aqi_pm2_5,us_aqi_pm10";
const AIR_QUALITY_HOURLY: &str = "european_aqi,us_aqi";
const RADIATION_CURRENT: &str = "uv_index,uv_index_clear_sky,direct_normal_irradiance,diffuse_radiation,terrestrial_radiation,shortwave_radiation,global_tilted_irradiance";
const RADIATION_HOURLY: &str = "uv_index,uv_index_clear_sky";

/// Open-Meteo client. Forecast, marine and air quality live on separate hosts.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: UpstreamClient,
    forecast_url: String,
    marine_url: String,
    air_quality_url: String,
}

impl OpenMeteoClient {
    pub fn new(
        http: UpstreamClient,
        forecast_url: impl Into<String>,
        marine_url: impl Into<String>,
        air_quality_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            forecast_url: forecast_url.into(),
            marine_url: marine_url.into(),
            air_quality_url: air_quality_url.into(),
        }
    }

    #[must_use]
    pub fn from_config(http: UpstreamClient, config: &SourcesConfig) -> Self {
        Self::new(
            http,
            &config.forecast_url,
            &config.marine_url,
            &config.air_quality_url,
        )
    }

    fn url(base: &str, coordinate: Coordinate, params: &str) -> String {
        format!(
            "{}?latitude={}&longitude={}&{}&timezone=auto",
            base.trim_end_matches('/'),
            coordinate.latitude,
            coordinate.longitude,
            params
        )
    }

    /// Single-day window, so the requested date is daily entry 0
    fn historical_params(date: NaiveDate) -> String {
        let date = date.format("%Y-%m-%d");
        format!("start_date={date}&end_date={date}&daily={DAILY_OUTLOOK}")
    }

    async fn daily_outlook(&self, source: &str, url: &str, day: usize) -> FetchResult<DayOutlook> {
        let response: raw::DailyResponse = self.http.get_json(source, url).await?;
        response.outlook(day)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn current_weather(&self, coordinate: Coordinate) -> FetchResult<CurrentWeather> {
        let url = Self::url(&self.forecast_url, coordinate, "current_weather=true");
        let response: raw::CurrentWeatherResponse = self.http.get_json("current", &url).await?;
        let current = response.into_current()?;
        info!(
            "Current weather: {}, wind {}, {}",
            current.format_temperature(),
            current.format_wind(),
            current.description
        );
        Ok(current)
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn forecast(&self, coordinate: Coordinate) -> FetchResult<DayOutlook> {
        let url = Self::url(&self.forecast_url, coordinate, &format!("daily={DAILY_OUTLOOK}"));
        self.daily_outlook("forecast", &url, 1).await
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude, %date))]
    async fn historical(&self, coordinate: Coordinate, date: NaiveDate) -> FetchResult<DayOutlook> {
        let url = Self::url(&self.forecast_url, coordinate, &Self::historical_params(date));
        self.daily_outlook("historical", &url, 0).await
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn marine(&self, coordinate: Coordinate) -> FetchResult<MarineConditions> {
        let params = format!("current={MARINE_CURRENT}&hourly={MARINE_HOURLY}");
        let url = Self::url(&self.marine_url, coordinate, &params);
        let response: raw::MarineResponse = self.http.get_json("marine", &url).await?;
        Ok(response.into())
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn air_quality(&self, coordinate: Coordinate) -> FetchResult<AirQuality> {
        let params = format!("current={AIR_QUALITY_CURRENT}&hourly={AIR_QUALITY_HOURLY}");
        let url = Self::url(&self.air_quality_url, coordinate, &params);
        let response: raw::AirQualityResponse = self.http.get_json("air_quality", &url).await?;
        Ok(response.into())
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn flood(&self, coordinate: Coordinate) -> FetchResult<FloodReading> {
        let url = Self::url(
            &self.forecast_url,
            coordinate,
            "current=precipitation&daily=precipitation_sum",
        );
        let response: raw::PrecipitationResponse = self.http.get_json("flood", &url).await?;
        let reading = response.into_flood_reading();
        info!("Derived flood index {} ({})", reading.index, reading.risk);
        Ok(reading)
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn radiation(&self, coordinate: Coordinate) -> FetchResult<SolarRadiation> {
        let params = format!("current={RADIATION_CURRENT}&hourly={RADIATION_HOURLY}");
        let url = Self::url(&self.forecast_url, coordinate, &params);
        let response: raw::RadiationResponse = self.http.get_json("radiation", &url).await?;
        let radiation: SolarRadiation = response.into();
        if let Some(shortwave) = radiation.shortwave_radiation {
            info!("Shortwave radiation {}", format_radiation(shortwave));
        }
        Ok(radiation)
    }
}

/// Raw `Open-Meteo` response structures and conversions into the models
mod raw {
    use super::*;
    use serde::Deserialize;

    type Series<T> = Option<Vec<Option<T>>>;

    fn at<T: Copy>(series: &Series<T>, i: usize) -> Option<T> {
        series.as_ref().and_then(|values| values.get(i).copied().flatten())
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherResponse {
        #[serde(default)]
        pub timezone: Option<String>,
        pub current_weather: Option<CurrentWeatherBlock>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherBlock {
        pub time: String,
        pub temperature: f64,
        pub windspeed: f64,
        pub winddirection: f64,
        pub weathercode: u8,
    }

    impl CurrentWeatherResponse {
        pub fn into_current(self) -> FetchResult<CurrentWeather> {
            let current = self.current_weather.ok_or_else(|| {
                SourceError::Payload("response carries no current_weather block".to_string())
            })?;

            Ok(CurrentWeather {
                observed_at: current.time,
                timezone: self.timezone.unwrap_or_else(|| "GMT".to_string()),
                temperature_c: current.temperature,
                wind_speed_kmh: current.windspeed,
                wind_direction_deg: current.winddirection,
                weather_code: current.weathercode,
                description: weather_code_to_description(current.weathercode).to_string(),
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyResponse {
        pub daily: Option<DailyBlock>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyBlock {
        pub time: Vec<String>,
        pub temperature_2m_max: Series<f64>,
        pub temperature_2m_min: Series<f64>,
        pub weathercode: Series<u8>,
    }

    impl DailyResponse {
        /// Outlook for the `day`-th entry of the daily block
        pub fn outlook(self, day: usize) -> FetchResult<DayOutlook> {
            let daily = self
                .daily
                .ok_or_else(|| {
                    SourceError::Payload("response carries no daily block".to_string())
                })?;

            let date = daily
                .time
                .get(day)
                .ok_or_else(|| SourceError::NotFound(format!("no daily entry at index {day}")))?;
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| SourceError::Payload(format!("invalid daily date '{date}': {e}")))?;

            let missing =
                |field: &str| SourceError::Payload(format!("daily {field} missing for {date}"));
            let weather_code = at(&daily.weathercode, day).ok_or_else(|| missing("weathercode"))?;

            Ok(DayOutlook {
                date,
                temperature_max_c: at(&daily.temperature_2m_max, day)
                    .ok_or_else(|| missing("temperature_2m_max"))?,
                temperature_min_c: at(&daily.temperature_2m_min, day)
                    .ok_or_else(|| missing("temperature_2m_min"))?,
                weather_code,
                description: weather_code_to_description(weather_code).to_string(),
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineResponse {
        pub current: Option<MarineCurrent>,
        pub hourly: Option<MarineHourly>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineCurrent {
        pub time: Option<String>,
        pub wave_height: Option<f64>,
        pub wave_direction: Option<f64>,
        pub wave_period: Option<f64>,
        pub wind_wave_height: Option<f64>,
        pub wind_wave_direction: Option<f64>,
        pub wind_wave_period: Option<f64>,
        pub swell_wave_height: Option<f64>,
        pub swell_wave_direction: Option<f64>,
        pub swell_wave_period: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineHourly {
        pub time: Vec<String>,
        pub wave_height: Series<f64>,
        pub wave_direction: Series<f64>,
        pub wave_period: Series<f64>,
    }

    impl From<MarineResponse> for MarineConditions {
        fn from(response: MarineResponse) -> Self {
            let hourly = response
                .hourly
                .map(|h| {
                    h.time
                        .iter()
                        .enumerate()
                        .map(|(i, time)| WaveSample {
                            time: time.clone(),
                            wave_height_m: at(&h.wave_height, i),
                            wave_direction_deg: at(&h.wave_direction, i),
                            wave_period_s: at(&h.wave_period, i),
                        })
                        .collect()
                })
                .unwrap_or_default();

            match response.current {
                Some(c) => MarineConditions {
                    observed_at: c.time,
                    wave_height_m: c.wave_height,
                    wave_direction_deg: c.wave_direction,
                    wave_period_s: c.wave_period,
                    wind_wave_height_m: c.wind_wave_height,
                    wind_wave_direction_deg: c.wind_wave_direction,
                    wind_wave_period_s: c.wind_wave_period,
                    swell_wave_height_m: c.swell_wave_height,
                    swell_wave_direction_deg: c.swell_wave_direction,
                    swell_wave_period_s: c.swell_wave_period,
                    hourly,
                },
                None => MarineConditions {
                    hourly,
                    ..Default::default()
                },
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct AirQualityResponse {
        pub current: Option<AirQualityCurrent>,
        pub hourly: Option<AirQualityHourly>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirQualityCurrent {
        pub time: Option<String>,
        pub european_aqi: Option<f64>,
        pub us_aqi: Option<f64>,
        pub european_aqi_pm2_5: Option<f64>,
        pub european_aqi_pm10: Option<f64>,
        pub us_aqi_pm2_5: Option<f64>,
        pub us_aqi_pm10: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirQualityHourly {
        pub time: Vec<String>,
        pub european_aqi: Series<f64>,
        pub us_aqi: Series<f64>,
    }

    impl From<AirQualityResponse> for AirQuality {
        fn from(response: AirQualityResponse) -> Self {
            let hourly = response
                .hourly
                .map(|h| {
                    h.time
                        .iter()
                        .enumerate()
                        .map(|(i, time)| AqiSample {
                            time: time.clone(),
                            european_aqi: at(&h.european_aqi, i),
                            us_aqi: at(&h.us_aqi, i),
                        })
                        .collect()
                })
                .unwrap_or_default();

            match response.current {
                Some(c) => AirQuality {
                    observed_at: c.time,
                    european_aqi: c.european_aqi,
                    us_aqi: c.us_aqi,
                    european_aqi_pm2_5: c.european_aqi_pm2_5,
                    european_aqi_pm10: c.european_aqi_pm10,
                    us_aqi_pm2_5: c.us_aqi_pm2_5,
                    us_aqi_pm10: c.us_aqi_pm10,
                    hourly,
                },
                None => AirQuality {
                    hourly,
                    ..Default::default()
                },
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct PrecipitationResponse {
        pub current: Option<PrecipitationCurrent>,
        pub daily: Option<PrecipitationDaily>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PrecipitationCurrent {
        pub time: Option<String>,
        pub precipitation: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PrecipitationDaily {
        pub precipitation_sum: Series<f64>,
    }

    impl PrecipitationResponse {
        /// Missing readings count as zero precipitation
        pub fn into_flood_reading(self) -> FloodReading {
            let (observed_at, current_mm) = match self.current {
                Some(c) => (c.time, c.precipitation.unwrap_or(0.0)),
                None => (None, 0.0),
            };
            let daily_mm = self
                .daily
                .and_then(|d| at(&d.precipitation_sum, 0))
                .unwrap_or(0.0);

            FloodReading::from_precipitation(observed_at, current_mm, daily_mm)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct RadiationResponse {
        pub current: Option<RadiationCurrent>,
        pub hourly: Option<RadiationHourly>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RadiationCurrent {
        pub time: Option<String>,
        pub uv_index: Option<f64>,
        pub uv_index_clear_sky: Option<f64>,
        pub direct_normal_irradiance: Option<f64>,
        pub diffuse_radiation: Option<f64>,
        pub terrestrial_radiation: Option<f64>,
        pub shortwave_radiation: Option<f64>,
        pub global_tilted_irradiance: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RadiationHourly {
        pub time: Vec<String>,
        pub uv_index: Series<f64>,
        pub uv_index_clear_sky: Series<f64>,
    }

    impl From<RadiationResponse> for SolarRadiation {
        fn from(response: RadiationResponse) -> Self {
            let hourly = response
                .hourly
                .map(|h| {
                    h.time
                        .iter()
                        .enumerate()
                        .map(|(i, time)| UvSample {
                            time: time.clone(),
                            uv_index: at(&h.uv_index, i),
                            uv_index_clear_sky: at(&h.uv_index_clear_sky, i),
                        })
                        .collect()
                })
                .unwrap_or_default();

            match response.current {
                Some(c) => SolarRadiation {
                    observed_at: c.time,
                    uv_index: c.uv_index,
                    uv_index_clear_sky: c.uv_index_clear_sky,
                    direct_normal_irradiance: c.direct_normal_irradiance,
                    diffuse_radiation: c.diffuse_radiation,
                    shortwave_radiation: c.shortwave_radiation,
                    terrestrial_radiation: c.terrestrial_radiation,
                    global_tilted_irradiance: c.global_tilted_irradiance,
                    hourly,
                },
                None => SolarRadiation {
                    hourly,
                    ..Default::default()
                },
            }
        }
    }
}
