use super::*;

const AUTH_036: &str = "urn:iso:std:iso:20022:tech:xsd:auth.036.001.02";

/// Solr-style index response carrying one download link among sibling fields
const INDEX_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <result name="response" numFound="1" start="0">
    <doc>
      <str name="checksum">a1b2c3</str>
      <str name="file_name">DLTINS_20210117_01of01.zip</str>
      <str name="download_link">https://registry.example.org/firds/DLTINS_20210117_01of01.zip</str>
    </doc>
  </result>
</response>"#;

#[test]
fn parse_builds_tree_with_resolved_namespaces() {
    let xml = format!(
        r#"<Document xmlns="{AUTH_036}"><FinInstrm><Id>X1</Id></FinInstrm></Document>"#
    );
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();

    let root = document.root();
    assert_eq!(root.local_name(), "Document");
    assert_eq!(root.namespace(), Some(AUTH_036));
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].local_name(), "FinInstrm");
    assert_eq!(root.children()[0].namespace(), Some(AUTH_036));
}

#[test]
fn parse_resolves_explicit_prefixes() {
    let xml = format!(
        r#"<a:Document xmlns:a="{AUTH_036}"><a:FinInstrm><a:Id>X1</a:Id></a:FinInstrm></a:Document>"#
    );
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    assert_eq!(document.find_text(&table, "ns2:Id").unwrap(), Some("X1"));
}

#[test]
fn parse_rejects_truncated_document() {
    let result = XmlDocument::parse(b"<xml><data>example data<");
    assert!(matches!(result, Err(Error::MalformedXml(_))));
}

#[test]
fn parse_rejects_unclosed_element() {
    let result = XmlDocument::parse(b"<root><open></root>");
    assert!(matches!(result, Err(Error::MalformedXml(_))));
}

#[test]
fn parse_rejects_empty_input() {
    let result = XmlDocument::parse(b"");
    assert!(matches!(result, Err(Error::MalformedXml(_))));
}

#[test]
fn parse_rejects_second_document_element() {
    let result = XmlDocument::parse(b"<a></a><b></b>");
    assert!(matches!(result, Err(Error::MalformedXml(_))));
}

#[test]
fn find_text_returns_first_match_in_document_order() {
    let xml = format!(
        r#"<Document xmlns="{AUTH_036}">
             <FinInstrm><Id>first</Id></FinInstrm>
             <FinInstrm><Id>second</Id></FinInstrm>
           </Document>"#
    );
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    assert_eq!(document.find_text(&table, "ns2:Id").unwrap(), Some("first"));
}

#[test]
fn find_text_absent_path_is_none_not_error() {
    let xml = format!(r#"<Document xmlns="{AUTH_036}"><Id>X1</Id></Document>"#);
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    assert_eq!(document.find_text(&table, "ns2:FullNm").unwrap(), None);
}

#[test]
fn find_text_unknown_alias_silently_matches_nothing() {
    let xml = format!(r#"<Document xmlns="{AUTH_036}"><Id>X1</Id></Document>"#);
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    assert_eq!(document.find_text(&table, "ns9:Id").unwrap(), None);
}

#[test]
fn find_text_wrong_binding_matches_nothing() {
    let xml = format!(r#"<Document xmlns="{AUTH_036}"><Id>X1</Id></Document>"#);
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let mut table = NamespaceTable::empty();
    table.bind("ns2", "urn:example:some-other-schema");
    assert_eq!(document.find_text(&table, "ns2:Id").unwrap(), None);
}

#[test]
fn find_text_rejects_invalid_expression() {
    let xml = format!(r#"<Document xmlns="{AUTH_036}"><Id>X1</Id></Document>"#);
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    assert!(matches!(
        document.find_text(&table, "ns2:"),
        Err(Error::Unexpected(_))
    ));
    assert!(matches!(
        document.find_text(&table, ""),
        Err(Error::Unexpected(_))
    ));
}

#[test]
fn find_text_unprefixed_query_matches_unbound_elements() {
    let document = XmlDocument::parse(b"<root><leaf>plain</leaf></root>").unwrap();
    let table = NamespaceTable::default();
    assert_eq!(document.find_text(&table, "leaf").unwrap(), Some("plain"));
}

#[test]
fn find_all_preserves_document_order() {
    let xml = format!(
        r#"<Document xmlns="{AUTH_036}">
             <Wrapper><FinInstrm><Id>a</Id></FinInstrm></Wrapper>
             <FinInstrm><Id>b</Id></FinInstrm>
           </Document>"#
    );
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    let table = NamespaceTable::default();
    let matches = document.find_all(&table, "ns2:FinInstrm").unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].find_text(&table, "ns2:Id").unwrap(), Some("a"));
    assert_eq!(matches[1].find_text(&table, "ns2:Id").unwrap(), Some("b"));
}

#[test]
fn attribute_lookup_and_text_trimming() {
    let document =
        XmlDocument::parse(b"<doc><str name=\"file_name\">\n  spaced.zip\n</str></doc>").unwrap();
    let node = &document.root().children()[0];
    assert_eq!(node.attribute("name"), Some("file_name"));
    assert_eq!(node.attribute("missing"), None);
    assert_eq!(node.text(), "spaced.zip");
}

#[test]
fn resolve_download_link_returns_text_verbatim() {
    let document = XmlDocument::parse(INDEX_XML.as_bytes()).unwrap();
    assert_eq!(
        resolve_download_link(&document).unwrap(),
        "https://registry.example.org/firds/DLTINS_20210117_01of01.zip"
    );
}

#[test]
fn resolve_download_link_first_match_wins() {
    let xml = r#"<response>
      <str name="download_link">https://first.example.org/a.zip</str>
      <str name="download_link">https://second.example.org/b.zip</str>
    </response>"#;
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    assert_eq!(
        resolve_download_link(&document).unwrap(),
        "https://first.example.org/a.zip"
    );
}

#[test]
fn resolve_download_link_ignores_other_str_elements() {
    let xml = r#"<response>
      <str name="checksum">abc</str>
      <int name="download_link">42</int>
    </response>"#;
    let document = XmlDocument::parse(xml.as_bytes()).unwrap();
    assert!(matches!(
        resolve_download_link(&document),
        Err(Error::LinkNotFound)
    ));
}

#[test]
fn resolve_download_link_missing_is_link_not_found() {
    let document = XmlDocument::parse(b"<response><doc/></response>").unwrap();
    assert!(matches!(
        resolve_download_link(&document),
        Err(Error::LinkNotFound)
    ));
}

#[test]
fn namespace_table_rebinding_replaces_prior_uri() {
    let mut table = NamespaceTable::default();
    assert_eq!(table.resolve("ns2"), Some(AUTH_036));
    table.bind("ns2", "urn:iso:std:iso:20022:tech:xsd:auth.036.001.03");
    assert_eq!(
        table.resolve("ns2"),
        Some("urn:iso:std:iso:20022:tech:xsd:auth.036.001.03")
    );
}
