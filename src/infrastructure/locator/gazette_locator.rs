//! Locator backed by the Imprensa Nacional search service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::header;
use tracing::{debug, error, info, warn};
use url::Url;

use super::listing::{ListingOutcome, find_edition_url};
use super::service::DocumentLocator;
use crate::domain::entities::EditionReference;
use crate::error::{HttpError, LocateError};
use crate::infrastructure::http::build_session_client;
use crate::utils::dates::{format_display_date, format_marker_date};

pub const DEFAULT_REFERER_BASE: &str = "https://www.in.gov.br/leiturajornal";
pub const DEFAULT_SEARCH_URL: &str = "https://pesquisa.in.gov.br/imprensa/core/jornalList.action";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://pesquisa.in.gov.br/imprensa/core/";
const ORIGIN: &str = "https://www.in.gov.br";

/// Journal identifiers the search service groups under Section 3.
const SECTION_JOURNALS: &str = "3,3000,3020,1040,526,530,608,609,610,611";

/// Endpoints and timeouts used by [`GazetteLocator`].
#[derive(Debug, Clone)]
pub struct LocatorSettings {
    pub referer_base: String,
    pub search_url: String,
    pub download_base: Url,
    pub referer_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            referer_base: DEFAULT_REFERER_BASE.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            download_base: Url::parse(DEFAULT_DOWNLOAD_BASE).unwrap(),
            referer_timeout: Duration::from_secs(15),
            search_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolves editions with a two-step exchange: a GET of the reading page to
/// obtain session cookies, then a POST of the search form in the same session.
pub struct GazetteLocator {
    settings: LocatorSettings,
}

impl GazetteLocator {
    pub fn new(settings: LocatorSettings) -> Self {
        Self { settings }
    }

    fn referer_url(&self, date: NaiveDate) -> String {
        format!(
            "{}?data={}&secao=do3",
            self.settings.referer_base,
            format_marker_date(date)
        )
    }

    /// Form fields of the search request.
    pub fn search_form(date: NaiveDate) -> Vec<(&'static str, String)> {
        let day_month = date.format("%d/%m").to_string();
        vec![
            ("edicao.txtPesquisa", String::new()),
            ("edicao.dtInicio", day_month.clone()),
            ("edicao.dtFim", day_month),
            ("edicao.ano", date.year().to_string()),
            ("edicao.jornal", SECTION_JOURNALS.to_string()),
            ("edicao.fonetica", "null".to_string()),
            ("jornal", "do3".to_string()),
            ("t", "com.liferay.journal.model.JournalArticle".to_string()),
        ]
    }

    /// Runs the session exchange and returns the listing HTML.
    async fn fetch_listing(&self, date: NaiveDate) -> Result<String, LocateError> {
        let client = build_session_client().map_err(|e| LocateError::Session(e.to_string()))?;
        let referer = self.referer_url(date);

        client
            .get(&referer)
            .timeout(self.settings.referer_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LocateError::Referer {
                url: referer.clone(),
                source: HttpError::from(e),
            })?;

        let search_error = |e: reqwest::Error| LocateError::Search {
            url: self.settings.search_url.clone(),
            source: HttpError::from(e),
        };

        client
            .post(&self.settings.search_url)
            .header(header::ORIGIN, ORIGIN)
            .header(header::REFERER, &referer)
            .form(&Self::search_form(date))
            .timeout(self.settings.search_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(search_error)?
            .text()
            .await
            .map_err(search_error)
    }
}

impl Default for GazetteLocator {
    fn default() -> Self {
        Self::new(LocatorSettings::default())
    }
}

#[async_trait]
impl DocumentLocator for GazetteLocator {
    async fn locate(&self, date: NaiveDate) -> Option<EditionReference> {
        let date_str = format_display_date(date);

        let html = match self.fetch_listing(date).await {
            Ok(html) => html,
            Err(e) if e.http().is_some_and(HttpError::is_server_error) => {
                warn!(date = %date_str, error = %e, "Search service returned a server error");
                return None;
            }
            Err(e) => {
                error!(date = %date_str, error = %e, "Search request failed");
                return None;
            }
        };

        match find_edition_url(&html, &self.settings.download_base) {
            ListingOutcome::Found(url) => {
                info!(date = %date_str, url = %url, "Edition PDF URL found");
                Some(EditionReference::new(url))
            }
            ListingOutcome::TableMissing => {
                warn!(date = %date_str, "Results table 'ResultadoConsulta' not found");
                None
            }
            ListingOutcome::NoMatch { inspected_cells } => {
                for cell in &inspected_cells {
                    debug!(date = %date_str, cell = %cell, "Section 3 row without a usable download link");
                }
                warn!(date = %date_str, "No Section 3 PDF found");
                None
            }
        }
    }
}
