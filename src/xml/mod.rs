//! Namespace-aware XML decoding and querying
//!
//! This module parses a byte buffer into a navigable tree ([`XmlDocument`])
//! and answers namespace-qualified first-match queries against it. Queries
//! are driven by a [`NamespaceTable`] — plain data mapping aliases to target
//! namespace URIs — so an alternate schema family can be substituted without
//! touching any extraction logic.
//!
//! Query semantics follow the register's reference-data documents: a query
//! is a single `alias:LocalName` qualified name matched against all strict
//! descendants of the queried node in depth-first document order. An absent
//! path is `None`, never an error; an alias missing from the table silently
//! matches nothing.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

/// Mapping of namespace aliases to target namespace URIs
///
/// The default table binds the five ISO 20022 aliases of the reference-data
/// schema family. The table is data, not code: deserialize a different
/// mapping to retarget every qualified query at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTable {
    aliases: BTreeMap<String, String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        let mut table = Self {
            aliases: BTreeMap::new(),
        };
        table.bind("ns", "urn:iso:std:iso:20022:tech:xsd:head.003.001.01");
        table.bind("ns2", "urn:iso:std:iso:20022:tech:xsd:auth.036.001.02");
        table.bind("ns3", "urn:iso:std:iso:20022:tech:xsd:auth.037.001.02");
        table.bind("ns4", "urn:iso:std:iso:20022:tech:xsd:coll.018.001.01");
        table.bind("ns5", "urn:iso:std:iso:20022:tech:xsd:secval.010.001.02");
        table
    }
}

impl NamespaceTable {
    /// An empty table with no bindings
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Bind an alias to a target namespace URI, replacing any prior binding
    pub fn bind(&mut self, alias: impl Into<String>, uri: impl Into<String>) {
        self.aliases.insert(alias.into(), uri.into());
    }

    /// Resolve an alias to its bound URI, if any
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }
}

/// Split a `alias:LocalName` query into its resolved parts
///
/// Returns `Ok(None)` when the alias has no binding in the table — the
/// query then matches nothing, which is accepted behavior rather than an
/// error. A structurally invalid expression (empty local name or alias) is
/// the caller's bug and surfaces as [`Error::Unexpected`].
fn resolve_query<'a>(
    table: &'a NamespaceTable,
    expr: &'a str,
) -> Result<Option<(Option<&'a str>, &'a str)>> {
    let invalid = || Error::Unexpected(format!("invalid XML query expression '{expr}'"));
    match expr.split_once(':') {
        Some((alias, local)) => {
            if alias.is_empty() || local.is_empty() {
                return Err(invalid());
            }
            match table.resolve(alias) {
                Some(uri) => Ok(Some((Some(uri), local))),
                None => Ok(None),
            }
        }
        None => {
            if expr.is_empty() {
                return Err(invalid());
            }
            Ok(Some((None, expr)))
        }
    }
}

/// One element of a parsed document
#[derive(Clone, Debug)]
pub struct XmlNode {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// The element's resolved namespace URI, if it is bound to one
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The element's local (unprefixed) tag name
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The element's direct text content, surrounding whitespace trimmed
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Child elements in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Look up an attribute value by its local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local_name == local && self.namespace.as_deref() == namespace
    }

    fn find_descendant(&self, namespace: Option<&str>, local: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.matches(namespace, local) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(namespace, local) {
                return Some(found);
            }
        }
        None
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: Option<&str>,
        local: &str,
        out: &mut Vec<&'a XmlNode>,
    ) {
        for child in &self.children {
            if child.matches(namespace, local) {
                out.push(child);
            }
            child.collect_descendants(namespace, local, out);
        }
    }

    /// First strict descendant matching the qualified query, document order
    pub fn find_first(&self, table: &NamespaceTable, expr: &str) -> Result<Option<&XmlNode>> {
        match resolve_query(table, expr)? {
            Some((namespace, local)) => Ok(self.find_descendant(namespace, local)),
            None => Ok(None),
        }
    }

    /// Text of the first matching strict descendant, or `None` when absent
    pub fn find_text(&self, table: &NamespaceTable, expr: &str) -> Result<Option<&str>> {
        Ok(self.find_first(table, expr)?.map(XmlNode::text))
    }

    /// All strict descendants matching the qualified query, document order
    pub fn find_all<'a>(
        &'a self,
        table: &NamespaceTable,
        expr: &str,
    ) -> Result<Vec<&'a XmlNode>> {
        match resolve_query(table, expr)? {
            Some((namespace, local)) => {
                let mut out = Vec::new();
                self.collect_descendants(namespace, local, &mut out);
                Ok(out)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A parsed XML document
///
/// Owns the whole element tree; all queries borrow from it. Parsing is
/// all-or-nothing — there is no partial recovery from malformed input.
#[derive(Clone, Debug)]
pub struct XmlDocument {
    root: XmlNode,
}

impl XmlDocument {
    /// Parse a byte buffer into a document tree
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedXml`] on any syntax error: mismatched or
    /// unclosed tags, undeclared namespace prefixes, bad attribute syntax,
    /// content outside the document element, or a buffer with no element
    /// at all.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = NsReader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let (resolve, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(|e| Error::MalformedXml(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::MalformedXml(
                            "content after document element".to_string(),
                        ));
                    }
                    stack.push(node_from_start(&resolve, &start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::MalformedXml(
                            "content after document element".to_string(),
                        ));
                    }
                    let node = node_from_start(&resolve, &start)?;
                    attach(node, &mut stack, &mut root);
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        Error::MalformedXml("closing tag without opening tag".to_string())
                    })?;
                    attach(node, &mut stack, &mut root);
                }
                Event::Text(text) => {
                    let content = text
                        .unescape()
                        .map_err(|e| Error::MalformedXml(e.to_string()))?;
                    match stack.last_mut() {
                        Some(open) => open.text.push_str(&content),
                        None => {
                            if !content.trim().is_empty() {
                                return Err(Error::MalformedXml(
                                    "text outside document element".to_string(),
                                ));
                            }
                        }
                    }
                }
                Event::CData(data) => {
                    let bytes = data.into_inner();
                    let content = String::from_utf8_lossy(&bytes);
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&content);
                    }
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::MalformedXml(
                "unexpected end of document inside open element".to_string(),
            ));
        }
        let root =
            root.ok_or_else(|| Error::MalformedXml("no document element".to_string()))?;
        Ok(Self { root })
    }

    /// The document element
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Text of the first matching element anywhere beneath the root
    pub fn find_text(&self, table: &NamespaceTable, expr: &str) -> Result<Option<&str>> {
        if let Some((namespace, local)) = resolve_query(table, expr)? {
            if self.root.matches(namespace, local) {
                return Ok(Some(self.root.text()));
            }
        }
        self.root.find_text(table, expr)
    }

    /// All matching elements in the document, including the root itself
    pub fn find_all<'a>(
        &'a self,
        table: &NamespaceTable,
        expr: &str,
    ) -> Result<Vec<&'a XmlNode>> {
        let mut out = Vec::new();
        if let Some((namespace, local)) = resolve_query(table, expr)? {
            if self.root.matches(namespace, local) {
                out.push(&self.root);
            }
            self.root.collect_descendants(namespace, local, &mut out);
        }
        Ok(out)
    }
}

fn attach(node: XmlNode, stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn node_from_start(resolve: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<XmlNode> {
    let namespace = match resolve {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(Error::MalformedXml(format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            )));
        }
    };
    let local_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| Error::MalformedXml(e.to_string()))?;
        let key = attribute.key;
        // Namespace declarations are resolved by the reader, not kept as data
        if key.as_ref() == b"xmlns" || key.as_ref().starts_with(b"xmlns:") {
            continue;
        }
        let name = String::from_utf8_lossy(key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::MalformedXml(e.to_string()))?
            .into_owned();
        attributes.push((name, value));
    }

    Ok(XmlNode {
        namespace,
        local_name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

/// Resolve the payload download link from a parsed index document
///
/// Scans every element at any depth — namespace ignored — for a `str` tag
/// whose `name` attribute equals `download_link`; the first match in
/// document order wins and its text is returned verbatim. The returned
/// string is not validated as a URL; that is deferred to the transport.
///
/// # Errors
///
/// Returns [`Error::LinkNotFound`] when no such element exists.
pub fn resolve_download_link(document: &XmlDocument) -> Result<&str> {
    fn scan(node: &XmlNode) -> Option<&XmlNode> {
        if node.local_name() == "str" && node.attribute("name") == Some("download_link") {
            return Some(node);
        }
        for child in node.children() {
            if let Some(found) = scan(child) {
                return Some(found);
            }
        }
        None
    }

    match scan(document.root()) {
        Some(node) => Ok(node.text()),
        None => Err(Error::LinkNotFound),
    }
}
