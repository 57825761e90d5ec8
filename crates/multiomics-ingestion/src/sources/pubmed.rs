//! PubMed E-utilities esearch client.
//!
//! Endpoint used:
//!   esearch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!
//! Only `Count`, `RetMax` and `IdList/Id` are read from the XML response.

use async_trait::async_trait;
use multiomics_common::error::{CensusError, Result};
use multiomics_common::keywords::DEFAULT_RETMAX;
use multiomics_common::sandbox::SandboxClient as Client;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument};
use url::Url;

use super::SearchSource;
use crate::combinations::KeywordCombination;
use crate::models::EsearchResult;
use crate::years::YearSpan;

pub const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

const ROOT: &[u8] = b"eSearchResult";
const COUNT: &[u8] = b"Count";
const RETMAX: &[u8] = b"RetMax";
const ID_LIST: &[u8] = b"IdList";
const ID: &[u8] = b"Id";
const ERROR: &[u8] = b"ERROR";

/// Build the esearch term for one (year, combination) pair:
/// `2000/01/01[Date - Publication]:2000/12/31[Date - Publication] AND genomics[Other Term] AND ...`
pub fn build_term(combination: &KeywordCombination, span: &YearSpan) -> String {
    let mut term = format!(
        "{}[Date - Publication]:{}[Date - Publication]",
        span.from_label(),
        span.until_label()
    );
    for keyword in combination.keywords() {
        term.push_str(" AND ");
        term.push_str(keyword);
        term.push_str("[Other Term]");
    }
    term
}

pub struct PubMedClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    retmax: u64,
}

impl PubMedClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: ESEARCH_URL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            retmax: DEFAULT_RETMAX,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retmax(mut self, retmax: u64) -> Self {
        self.retmax = retmax;
        self
    }

    fn params(&self, term: &str, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("retmax", self.retmax.to_string()),
        ];
        if let Some(key) = api_key {
            params.push(("api_key", key.to_string()));
        }
        params.push(("term", term.to_string()));
        params
    }
}

#[async_trait]
impl SearchSource for PubMedClient {
    fn request_url(&self, term: &str) -> String {
        let masked = self.api_key.as_ref().map(|_| "***");
        match Url::parse_with_params(&self.base_url, self.params(term, masked)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}?term={}", self.base_url, term),
        }
    }

    #[instrument(skip(self))]
    async fn esearch(&self, term: &str) -> Result<EsearchResult> {
        let params = self.params(term, self.api_key.as_deref());

        let resp = self.client
            .get(&self.base_url)?
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CensusError::HttpStatus {
                status: status.as_u16(),
                url: self.request_url(term),
            });
        }

        let xml = resp.text().await?;
        let result = parse_esearch_xml(&xml)?;
        debug!(count = result.count, ids = result.ids.len(), "PubMed esearch returned PMIDs");
        Ok(result)
    }
}

/// Parse an `<eSearchResult>` document.
///
/// `Count` and `RetMax` are read only as direct children of the root;
/// the `TranslationStack` carries its own nested `Count` elements.
pub fn parse_esearch_xml(xml: &str) -> Result<EsearchResult> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut count: Option<u64> = None;
    let mut retmax: Option<u64> = None;
    let mut ids = Vec::new();
    let mut error: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => path.push(e.name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| CensusError::Xml(e.to_string()))?
                    .trim()
                    .to_string();
                if at(&path, &[ROOT, COUNT]) {
                    count = Some(parse_number("Count", &text)?);
                } else if at(&path, &[ROOT, RETMAX]) {
                    retmax = Some(parse_number("RetMax", &text)?);
                } else if at(&path, &[ROOT, ID_LIST, ID]) {
                    if !text.is_empty() {
                        ids.push(text);
                    }
                } else if path.last().map(|n| n.as_slice()) == Some(ERROR) {
                    error = Some(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CensusError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if let Some(message) = error {
        return Err(CensusError::Eutils(message));
    }

    Ok(EsearchResult {
        count: count.ok_or_else(|| CensusError::Xml("response has no Count".into()))?,
        retmax: retmax.ok_or_else(|| CensusError::Xml("response has no RetMax".into()))?,
        ids,
    })
}

fn at(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

fn parse_number(field: &str, text: &str) -> Result<u64> {
    text.parse()
        .map_err(|_| CensusError::Xml(format!("{} is not a number: {:?}", field, text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinations::keyword_combinations;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult><Count>3</Count><RetMax>3</RetMax><RetStart>0</RetStart>
<IdList><Id>12465651</Id><Id> 12159840 </Id><Id>11701847</Id></IdList>
<TranslationSet/>
<TranslationStack>
  <TermSet><Term>2000/01/01[PDAT]</Term><Field>PDAT</Field><Count>0</Count><Explode>N</Explode></TermSet>
  <TermSet><Term>genomics[Other Term]</Term><Field>Other Term</Field><Count>7402</Count><Explode>N</Explode></TermSet>
  <OP>AND</OP>
</TranslationStack>
<QueryTranslation>2000/01/01[PDAT] : 2000/12/31[PDAT] AND genomics[Other Term]</QueryTranslation>
</eSearchResult>"#;

    #[test]
    fn test_parse_esearch_reads_top_level_fields() {
        let result = parse_esearch_xml(SAMPLE).unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.retmax, 3);
        assert_eq!(result.ids, vec!["12465651", "12159840", "11701847"]);
    }

    #[test]
    fn test_parse_empty_id_list() {
        let xml = "<eSearchResult><Count>0</Count><RetMax>0</RetMax><RetStart>0</RetStart><IdList/></eSearchResult>";
        let result = parse_esearch_xml(xml).unwrap();
        assert_eq!(result.count, 0);
        assert!(result.ids.is_empty());
    }

    #[test]
    fn test_parse_eutils_error_element() {
        let xml = "<eSearchResult><ERROR>Invalid query</ERROR></eSearchResult>";
        match parse_esearch_xml(xml) {
            Err(CensusError::Eutils(msg)) => assert_eq!(msg, "Invalid query"),
            other => panic!("expected Eutils error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_xml_body() {
        let err = parse_esearch_xml(r#"{"error":"API key invalid"}"#).unwrap_err();
        assert!(matches!(err, CensusError::Xml(_)));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        let err = parse_esearch_xml("<eSearchResult><Count>1</RetMax></eSearchResult>").unwrap_err();
        assert!(matches!(err, CensusError::Xml(_)));
    }

    #[test]
    fn test_build_term_ands_every_keyword() {
        let combos = keyword_combinations(&["genomics", "proteomics", "metabolomics"]).unwrap();
        let span = YearSpan::for_year(2000).unwrap();
        assert_eq!(
            build_term(&combos[3], &span),
            "2000/01/01[Date - Publication]:2000/12/31[Date - Publication] \
             AND genomics[Other Term] AND proteomics[Other Term] AND metabolomics[Other Term]"
        );
    }

    #[test]
    fn test_request_url_masks_api_key() {
        let client = PubMedClient::new(Client::new().unwrap(), Some("secret-key".into()));
        let url = client.request_url("genomics[Other Term]");
        assert!(url.starts_with(ESEARCH_URL));
        assert!(url.contains("retmax=100000"));
        assert!(url.contains("api_key=***") || url.contains("api_key=%2A%2A%2A"));
        assert!(!url.contains("secret-key"));
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let client = PubMedClient::new(Client::new().unwrap(), Some(String::new()));
        assert!(!client.request_url("x").contains("api_key"));
    }

    #[tokio::test]
    async fn test_foreign_base_url_is_refused_before_sending() {
        let client = PubMedClient::new(Client::new().unwrap(), None).with_base_url("https://example.com/x");
        let err = client.esearch("genomics[Other Term]").await.unwrap_err();
        assert!(matches!(err, CensusError::Security(_)));
        assert!(err.is_fatal());
    }
}
