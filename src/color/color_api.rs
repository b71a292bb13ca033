//! The Color API palette service (`color-api` feature)

use super::descriptor::HslColor;
use super::remote::{parse_scheme_response, PaletteRequest, PaletteService};
use crate::error::PaletteError;
use std::time::Duration;

/// Public endpoint of The Color API
pub const DEFAULT_BASE_URL: &str = "https://www.thecolorapi.com";

/// Blocking HTTP client for The Color API `/scheme` endpoint
#[derive(Debug, Clone)]
pub struct ColorApiService {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ColorApiService {
    /// Client for the public endpoint
    pub fn new() -> Result<Self, PaletteError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for another deployment of the same API
    pub fn with_base_url(base_url: &str) -> Result<Self, PaletteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PaletteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full request URL for a palette request (the seed's `%` signs percent-encoded)
    pub fn scheme_url(&self, request: &PaletteRequest) -> String {
        format!(
            "{}/scheme?hsl={}&mode={}&count={}&format=json",
            self.base_url,
            request.seed_css().replace('%', "%25"),
            request.scheme.as_str(),
            request.count
        )
    }
}

impl PaletteService for ColorApiService {
    fn generate(&self, request: &PaletteRequest) -> Result<Vec<HslColor>, PaletteError> {
        let url = self.scheme_url(request);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PaletteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaletteError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| PaletteError::Transport(e.to_string()))?;
        parse_scheme_response(&body, request.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::remote::ColorScheme;

    #[test]
    fn test_scheme_url() {
        let service = ColorApiService::with_base_url("http://localhost:8080/").unwrap();
        let request = PaletteRequest {
            seed_hue: 332,
            seed_saturation: 54,
            seed_lightness: 48,
            scheme: ColorScheme::Triad,
            count: 7,
        };
        assert_eq!(
            service.scheme_url(&request),
            "http://localhost:8080/scheme?hsl=hsl(332,54%25,48%25)&mode=triad&count=7&format=json"
        );
    }
}
