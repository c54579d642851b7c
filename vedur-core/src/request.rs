//! Query URL builders.
//!
//! Every builder validates the caller options before anything touches the
//! network: identifiers first, then language.

use std::sync::LazyLock;

use reqwest::Url;
use tracing::warn;

use crate::{
    catalog::{self, Descriptions},
    error::{Result, VedurError},
    model::{ForecastOptions, Lang, ObservationOptions, TextOptions},
};

/// XML weather service endpoint.
pub const XML_SERVICE_URL: &str = "http://xmlweather.vedur.is/";

/// HTML page listing observation stations.
pub const STATION_LIST_URL: &str = "http://www.vedur.is/vedur/stodvar?t=3";

static XML_SERVICE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(XML_SERVICE_URL).expect("static url is valid"));

static STATION_LIST: LazyLock<Url> =
    LazyLock::new(|| Url::parse(STATION_LIST_URL).expect("static url is valid"));

/// Query type sent as `type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Forecasts,
    Observations,
    Texts,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Forecasts => "forec",
            QueryKind::Observations => "obs",
            QueryKind::Texts => "txt",
        }
    }
}

/// A validated request ready to be fetched and normalized.
#[derive(Debug, Clone)]
pub struct Query {
    pub kind: QueryKind,
    pub url: Url,
    pub lang: Lang,
    pub descriptions: bool,
}

impl Query {
    /// Labels to attach to the envelope, if requested.
    pub fn descriptions(&self) -> Option<Descriptions> {
        self.descriptions.then(|| catalog::measurements(self.lang))
    }
}

fn identifiers<'a>(value: Option<&'a str>, what: &'static str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(ids) if !ids.is_empty() => Ok(ids),
        _ => Err(VedurError::MissingIdentifiers { what }),
    }
}

fn base_url(kind: QueryKind, lang: Lang, ids: &str) -> Url {
    let mut url = XML_SERVICE.clone();
    url.query_pairs_mut()
        .append_pair("op_w", "xml")
        .append_pair("view", "xml")
        .append_pair("type", kind.as_str())
        .append_pair("lang", lang.as_str())
        .append_pair("ids", ids);
    url
}

pub fn forecasts(options: &ForecastOptions) -> Result<Query> {
    let ids = identifiers(options.stations.as_deref(), "stations")?;
    let lang = Lang::resolve(options.lang.as_deref())?;

    let mut url = base_url(QueryKind::Forecasts, lang, ids);
    url.query_pairs_mut().append_pair("params", &catalog::params_value());

    Ok(Query { kind: QueryKind::Forecasts, url, lang, descriptions: options.descriptions })
}

pub fn observations(options: &ObservationOptions) -> Result<Query> {
    let ids = identifiers(options.stations.as_deref(), "stations")?;
    let lang = Lang::resolve(options.lang.as_deref())?;

    let mut url = base_url(QueryKind::Observations, lang, ids);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("params", &catalog::params_value());
        if let Some(time) = options.time.as_deref().filter(|t| !t.is_empty()) {
            pairs.append_pair("time", time);
        }
        if let Some(anytime) = options.anytime.as_deref().filter(|a| !a.is_empty()) {
            pairs.append_pair("anytime", anytime);
        }
    }

    Ok(Query { kind: QueryKind::Observations, url, lang, descriptions: options.descriptions })
}

pub fn texts(options: &TextOptions) -> Result<Query> {
    let ids = identifiers(options.types.as_deref(), "types")?;
    let lang = Lang::resolve(options.lang.as_deref())?;

    for id in split_ids(ids).filter(|id| !catalog::is_known_text_type(id)) {
        warn!(text_type = id, "unknown text type, sending anyway");
    }

    let url = base_url(QueryKind::Texts, lang, ids);
    Ok(Query { kind: QueryKind::Texts, url, lang, descriptions: false })
}

pub fn stations() -> Url {
    STATION_LIST.clone()
}

/// Split a comma/semicolon separated identifier list.
pub fn split_ids(ids: &str) -> impl Iterator<Item = &str> {
    ids.split([',', ';']).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
    }

    #[rstest]
    #[case(None, "is")]
    #[case(Some("is"), "is")]
    #[case(Some("en"), "en")]
    fn forecast_url_contains_ids_and_params(#[case] lang: Option<&str>, #[case] expected: &str) {
        let options = ForecastOptions {
            lang: lang.map(String::from),
            stations: Some("1;422".into()),
            descriptions: false,
        };
        let query = forecasts(&options).unwrap();

        assert_eq!(query.url.host_str(), Some("xmlweather.vedur.is"));
        assert_eq!(query_value(&query.url, "op_w").as_deref(), Some("xml"));
        assert_eq!(query_value(&query.url, "view").as_deref(), Some("xml"));
        assert_eq!(query_value(&query.url, "type").as_deref(), Some("forec"));
        assert_eq!(query_value(&query.url, "lang").as_deref(), Some(expected));
        assert_eq!(query_value(&query.url, "ids").as_deref(), Some("1;422"));
        assert_eq!(
            query_value(&query.url, "params").as_deref(),
            Some("F;FX;FG;D;T;W;V;N;P;RH;SNC;SND;SED;RTE;TD;R")
        );
    }

    #[test]
    fn observation_url_appends_time_and_anytime() {
        let options = ObservationOptions {
            lang: Some("en".into()),
            stations: Some("1,571".into()),
            descriptions: true,
            time: Some("3h".into()),
            anytime: Some("1".into()),
        };
        let query = observations(&options).unwrap();

        assert_eq!(query.kind, QueryKind::Observations);
        assert_eq!(query_value(&query.url, "type").as_deref(), Some("obs"));
        assert_eq!(query_value(&query.url, "ids").as_deref(), Some("1,571"));
        assert_eq!(query_value(&query.url, "time").as_deref(), Some("3h"));
        assert_eq!(query_value(&query.url, "anytime").as_deref(), Some("1"));
        assert_eq!(query.descriptions().unwrap().get("F"), Some("Wind speed (m/s)"));
    }

    #[test]
    fn observation_url_without_optional_fields() {
        let options = ObservationOptions { stations: Some("1".into()), ..Default::default() };
        let query = observations(&options).unwrap();

        assert_eq!(query_value(&query.url, "time"), None);
        assert_eq!(query_value(&query.url, "anytime"), None);
        assert!(query.descriptions().is_none());
    }

    #[test]
    fn text_url_has_no_params() {
        let options = TextOptions { lang: None, types: Some("5,6".into()) };
        let query = texts(&options).unwrap();

        assert_eq!(query_value(&query.url, "type").as_deref(), Some("txt"));
        assert_eq!(query_value(&query.url, "ids").as_deref(), Some("5,6"));
        assert_eq!(query_value(&query.url, "params"), None);
        assert!(!query.descriptions);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    fn missing_stations(#[case] stations: Option<&str>) {
        let options =
            ForecastOptions { stations: stations.map(String::from), ..Default::default() };
        let err = forecasts(&options).unwrap_err();
        assert!(matches!(err, VedurError::MissingIdentifiers { what: "stations" }));
    }

    #[test]
    fn missing_types() {
        let err = texts(&TextOptions::default()).unwrap_err();
        assert!(matches!(err, VedurError::MissingIdentifiers { what: "types" }));
        assert_eq!(err.to_string(), "No types supplied");
    }

    #[test]
    fn invalid_language() {
        let options = ObservationOptions {
            lang: Some("fr".into()),
            stations: Some("1".into()),
            ..Default::default()
        };
        let err = observations(&options).unwrap_err();
        assert!(matches!(err, VedurError::InvalidLanguage(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn identifiers_are_checked_before_language() {
        let options = TextOptions { lang: Some("fr".into()), types: None };
        assert!(matches!(texts(&options).unwrap_err(), VedurError::MissingIdentifiers { .. }));
    }

    #[test]
    fn split_ids_accepts_both_separators() {
        let ids: Vec<_> = split_ids("1, 2;3;;").collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn station_list_url() {
        let url = stations();
        assert_eq!(url.as_str(), STATION_LIST_URL);
    }
}
