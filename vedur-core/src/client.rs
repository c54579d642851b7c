//! The four weather operations.
//!
//! Each call validates its options, performs exactly one GET through the
//! [`Transport`] and resolves to either an envelope or an error.

use tracing::{debug, instrument};

use crate::{
    error::Result,
    model::{
        Envelope, ForecastOptions, ObservationOptions, OperationInfo, Record, ServiceInfo,
        StationRecord, TextOptions,
    },
    normalize,
    request::{self, Query},
    stations,
    transport::{ClientConfig, HttpTransport, Transport},
    xml,
};

#[derive(Debug, Clone)]
pub struct VedurClient<T = HttpTransport> {
    transport: T,
}

impl VedurClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self { transport: HttpTransport::new(config)? })
    }
}

impl<T: Transport> VedurClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    async fn run(&self, query: Query) -> Result<Envelope<Record>> {
        let body = self.transport.fetch(&query.url).await?;
        let tree = xml::parse_xml(&body)?;
        let envelope = normalize::normalize(tree, &query)?;
        debug!(kind = ?query.kind, results = envelope.results.len(), "normalized response");
        Ok(envelope)
    }

    /// Station forecasts.
    #[instrument(skip(self))]
    pub async fn forecasts(&self, options: &ForecastOptions) -> Result<Envelope<Record>> {
        let query = request::forecasts(options)?;
        self.run(query).await
    }

    /// Latest station observations.
    #[instrument(skip(self))]
    pub async fn observations(&self, options: &ObservationOptions) -> Result<Envelope<Record>> {
        let query = request::observations(options)?;
        self.run(query).await
    }

    /// Regional text bulletins.
    #[instrument(skip(self))]
    pub async fn texts(&self, options: &TextOptions) -> Result<Envelope<Record>> {
        let query = request::texts(options)?;
        self.run(query).await
    }

    /// Automatic stations scraped from the station overview page.
    #[instrument(skip(self))]
    pub async fn available_stations(&self) -> Result<Envelope<StationRecord>> {
        let url = request::stations();
        let body = self.transport.fetch(&url).await?;
        Ok(Envelope::new(stations::scrape_stations(&body)?))
    }
}

/// Static description of the service and its operations.
pub fn info() -> Envelope<ServiceInfo> {
    Envelope::new(vec![ServiceInfo {
        info: "This is an api for Icelandic weather reports and observations",
        operations: vec![
            OperationInfo {
                name: "forecasts",
                required: &["stations"],
                optional: &["lang", "descriptions"],
            },
            OperationInfo {
                name: "observations",
                required: &["stations"],
                optional: &["lang", "descriptions", "time", "anytime"],
            },
            OperationInfo { name: "texts", required: &["types"], optional: &["lang"] },
            OperationInfo { name: "available_stations", required: &[], optional: &[] },
        ],
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VedurError;
    use async_trait::async_trait;
    use reqwest::Url;
    use std::sync::{Arc, Mutex};

    /// Serves a fixed body (or status error) and records requested URLs.
    #[derive(Debug, Clone, Default)]
    struct CannedTransport {
        body: String,
        status: Option<u16>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl CannedTransport {
        fn ok(body: &str) -> Self {
            Self { body: body.to_string(), ..Default::default() }
        }

        fn failing(status: u16) -> Self {
            Self { status: Some(status), ..Default::default() }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.status {
                Some(status) => Err(VedurError::UpstreamStatus {
                    url: url.to_string(),
                    status,
                    body: String::new(),
                }),
                None => Ok(self.body.clone()),
            }
        }
    }

    const OBSERVATIONS: &str = r#"<observations>
  <station id="1" valid="1">
    <name>Reykjavík</name><time>2014-01-20 09:00:00</time><T>1,5</T>
  </station>
</observations>"#;

    #[tokio::test]
    async fn observations_flow() {
        let transport = CannedTransport::ok(OBSERVATIONS);
        let client = VedurClient::with_transport(transport.clone());

        let options = ObservationOptions {
            stations: Some("1".into()),
            descriptions: true,
            time: Some("1h".into()),
            ..Default::default()
        };
        let envelope = client.observations(&options).await.unwrap();

        assert_eq!(envelope.results.len(), 1);
        assert_eq!(envelope.results[0]["T"], "1.5");
        assert_eq!(envelope.descriptions.unwrap().get("T"), Some("Hiti (°C)"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("type=obs"));
        assert!(calls[0].contains("time=1h"));
    }

    #[tokio::test]
    async fn validation_errors_skip_the_network() {
        let transport = CannedTransport::ok(OBSERVATIONS);
        let client = VedurClient::with_transport(transport.clone());

        let err = client
            .forecasts(&ForecastOptions {
                lang: Some("de".into()),
                stations: Some("1".into()),
                descriptions: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, VedurError::InvalidLanguage(_)));

        let err = client.texts(&TextOptions::default()).await.unwrap_err();
        assert!(matches!(err, VedurError::MissingIdentifiers { .. }));

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_returned_not_raised() {
        let client = VedurClient::with_transport(CannedTransport::failing(503));
        let options = ForecastOptions { stations: Some("1".into()), ..Default::default() };

        let err = client.forecasts(&options).await.unwrap_err();
        assert!(matches!(err, VedurError::UpstreamStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_an_xml_error() {
        let client = VedurClient::with_transport(CannedTransport::ok("<html><body>oops"));
        let options = TextOptions { lang: Some("en".into()), types: Some("5".into()) };

        let err = client.texts(&options).await.unwrap_err();
        assert!(matches!(err, VedurError::XmlParse { .. }));
    }

    #[tokio::test]
    async fn wrong_document_is_a_schema_mismatch() {
        let client = VedurClient::with_transport(CannedTransport::ok(OBSERVATIONS));
        let options = ForecastOptions { stations: Some("1".into()), ..Default::default() };

        let err = client.forecasts(&options).await.unwrap_err();
        assert!(matches!(err, VedurError::SchemaMismatch { .. }));
    }

    #[tokio::test]
    async fn available_stations_flow() {
        let html = r#"<html><body><table class="listtable">
<tr><td><a title="Reykjavík -" href="/vedur/stodvar?station=1">A</a></td></tr>
</table></body></html>"#;
        let transport = CannedTransport::ok(html);
        let client = VedurClient::with_transport(transport.clone());

        let envelope = client.available_stations().await.unwrap();
        assert_eq!(
            envelope.results,
            vec![StationRecord { name: "Reykjavík".into(), id: "1".into() }]
        );
        assert!(envelope.descriptions.is_none());
        assert_eq!(transport.calls(), vec![request::STATION_LIST_URL.to_string()]);
    }

    #[tokio::test]
    async fn available_stations_reports_pattern_mismatch() {
        let html = r#"<table class="listtable">
<tr><td><a title="Reykjavík -" href="/x">A</a></td></tr>
</table>"#;
        let client = VedurClient::with_transport(CannedTransport::ok(html));

        let err = client.available_stations().await.unwrap_err();
        assert!(matches!(err, VedurError::ScrapePatternMismatch { .. }));
    }

    #[test]
    fn info_lists_all_operations() {
        let info = info();
        let names: Vec<_> = info.results[0].operations.iter().map(|op| op.name).collect();
        assert_eq!(names, ["forecasts", "observations", "texts", "available_stations"]);
    }
}
