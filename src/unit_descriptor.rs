use roxmltree::{Document, Node};

use crate::{directory_lister::HashId, error::CrawlError, scraping_context::CrawlContext};

const SEMESTER_MARKER: &str = "Standard semester ";

/// One unit offering as described by its `section.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub unit_code: String,
    pub portal_url: String,
    /// Two-digit year, e.g. "21".
    pub year: String,
    /// Semester digit; `None` for anything that isn't a standard semester offering.
    pub semester: Option<String>,
}

/// Follows a path of child element names from `node`, like ElementTree's `find`.
pub(crate) fn find_child<'a, 'input>(
    node: Node<'a, 'input>,
    path: &[&str],
) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| {
        current
            .children()
            .find(|child| child.is_element() && child.has_tag_name(*name))
    })
}

/// Text of the element at `path`. An empty element reads as "", only a missing
/// one is an error.
pub(crate) fn child_text<'a>(node: Node<'a, '_>, path: &[&str]) -> Result<&'a str, CrawlError> {
    find_child(node, path)
        .map(|n| n.text().unwrap_or(""))
        .ok_or_else(|| CrawlError::Parse(format!("missing <{}>", path.join("/"))))
}

/// Everything after "Standard semester " up to the first character, if present.
pub fn semester_from_name(name: &str) -> Option<String> {
    name.split(SEMESTER_MARKER)
        .nth(1)
        .and_then(|rest| rest.chars().next())
        .map(String::from)
}

pub fn parse_unit_descriptor(xml: &str) -> Result<UnitRecord, CrawlError> {
    let document = Document::parse(xml).map_err(|e| CrawlError::Parse(e.to_string()))?;
    let root = document.root_element();

    let term_name = child_text(root, &["term", "name"])?;
    let year = term_name
        .get(2..)
        .ok_or_else(|| CrawlError::Parse(format!("term name too short: {term_name:?}")))?
        .to_string();
    let semester = semester_from_name(child_text(root, &["name"])?);
    let unit_code = child_text(root, &["course", "identifier"])?.to_string();
    let portal_url = child_text(root, &["portal", "url"])?.to_string();

    Ok(UnitRecord {
        unit_code,
        portal_url,
        year,
        semester,
    })
}

/// Fetches and parses `sections/{hash}/section.xml`.
pub async fn fetch_unit(ctx: &CrawlContext, hash: &HashId) -> Result<UnitRecord, CrawlError> {
    let url = ctx.crawl_config.unit_descriptor_url(hash);
    let xml = ctx.request_client.fetch_url_body(&url).await?;
    parse_unit_descriptor(&xml).map_err(|e| match e {
        CrawlError::Parse(reason) => CrawlError::Parse(format!("{url}: {reason}")),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_xml(term: &str, name: &str, code: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<section>
  <term><name>{term}</name></term>
  <name>{name}</name>
  <course><identifier>{code}</identifier><name>Software Engineering</name></course>
  <portal><url>http://echo.example/ess/portal/section/{code}</url></portal>
</section>"#
        )
    }

    #[test]
    fn parses_standard_semester_unit() {
        let xml = section_xml("2021", "CITS1001 Software Engineering Standard semester 2", "CITS1001");
        let unit = parse_unit_descriptor(&xml).unwrap();
        assert_eq!(
            unit,
            UnitRecord {
                unit_code: "CITS1001".to_string(),
                portal_url: "http://echo.example/ess/portal/section/CITS1001".to_string(),
                year: "21".to_string(),
                semester: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn semester_marker() {
        assert_eq!(semester_from_name("ENGR1000 Standard semester 1").as_deref(), Some("1"));
        assert_eq!(semester_from_name("ENGR1000 Summer intensive"), None);
        assert_eq!(semester_from_name("ENGR1000 Standard semester "), None);
    }

    #[test]
    fn non_standard_offering_is_not_an_error() {
        let xml = section_xml("2019", "GENG5505 Non-standard teaching period", "GENG5505");
        let unit = parse_unit_descriptor(&xml).unwrap();
        assert_eq!(unit.semester, None);
        assert_eq!(unit.year, "19");
    }

    #[test]
    fn missing_element_is_a_parse_error() {
        let xml = "<section><term><name>2021</name></term><name>x</name></section>";
        match parse_unit_descriptor(xml) {
            Err(CrawlError::Parse(reason)) => assert!(reason.contains("course/identifier")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_portal_url_is_kept() {
        let xml = "<section><term><name>2021</name></term>\
                   <name>CITS1001 Standard semester 1</name>\
                   <course><identifier>CITS1001</identifier></course>\
                   <portal><url/></portal></section>";
        let unit = parse_unit_descriptor(xml).unwrap();
        assert_eq!(unit.portal_url, "");
        assert_eq!(unit.semester.as_deref(), Some("1"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        assert!(matches!(
            parse_unit_descriptor("<section><term>"),
            Err(CrawlError::Parse(_))
        ));
    }
}
