//! `elink` response parsing.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::reader::Reader;

/// Collects the citing PMIDs of an `elink` response.
///
/// Only the first `LinkSetDb` element is read. Each `Link` inside it
/// contributes the text of its first `Id` element, in document order, even
/// when that text is empty. A response without `LinkSetDb` has no citations.
pub(crate) fn parse_cited_in(xml: &str) -> quick_xml::Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut citing = Vec::new();
    let mut in_link_set = false;
    // `Some` while inside a `Link`, holding its `Id` once read.
    let mut link: Option<Option<String>> = None;
    let mut id_text: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name() {
                QName(b"LinkSetDb") if !in_link_set => in_link_set = true,
                QName(b"Link") if in_link_set => link = Some(None),
                QName(b"Id") if matches!(link, Some(None)) => id_text = Some(String::new()),
                _ => (),
            },
            Event::Empty(e) if e.name() == QName(b"LinkSetDb") && !in_link_set => break,
            Event::Empty(e) if e.name() == QName(b"Id") && matches!(link, Some(None)) => {
                link = Some(Some(String::new()));
            }
            Event::Text(e) => {
                if let Some(text) = id_text.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = id_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.name() {
                QName(b"Id") => {
                    if let Some(text) = id_text.take() {
                        link = Some(Some(text));
                    }
                }
                QName(b"Link") if in_link_set => {
                    if let Some(Some(id)) = link.take() {
                        citing.push(id);
                    }
                }
                QName(b"LinkSetDb") if in_link_set => break,
                _ => (),
            },
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(citing)
}
