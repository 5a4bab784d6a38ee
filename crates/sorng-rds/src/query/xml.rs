//! Minimal XML extraction for Query protocol responses.
//!
//! RDS responses are shallow and well-formed, so elements are located by
//! exact tag match rather than with a full DOM. Text content is entity
//! unescaped with `quick-xml`.

use std::borrow::Cow;

/// Find the byte offset of the next opening `<tag>` or `<tag attr…>` at or
/// after `from`. Prefix matches (`<DBClusterIdentifier>` for `DBCluster`) are
/// skipped.
fn find_open(xml: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("<{}", tag);
    let mut search = from;
    while let Some(rel) = xml[search..].find(&needle) {
        let start = search + rel;
        let after = start + needle.len();
        match xml[after..].chars().next() {
            Some('>') => return Some((start, after + 1)),
            Some(c) if c.is_whitespace() => {
                let gt = xml[after..].find('>')?;
                return Some((start, after + gt + 1));
            }
            Some('/') if xml[after..].starts_with("/>") => return Some((start, after + 2)),
            _ => search = after,
        }
    }
    None
}

fn unescape(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

/// Locate the element `tag` starting at `from`; returns
/// `(element_start, content_start, content_end, element_end)`.
fn find_element(xml: &str, tag: &str, from: usize) -> Option<(usize, usize, usize, usize)> {
    let (start, content_start) = find_open(xml, tag, from)?;
    if xml[..content_start].ends_with("/>") {
        return Some((start, content_start, content_start, content_start));
    }
    let close = format!("</{}>", tag);
    // Nested elements with the same name are matched by depth.
    let mut depth = 1usize;
    let mut cursor = content_start;
    loop {
        let next_close = xml[cursor..].find(&close).map(|i| cursor + i)?;
        match find_open(xml, tag, cursor) {
            Some((nested, nested_content)) if nested < next_close => {
                if !xml[..nested_content].ends_with("/>") {
                    depth += 1;
                }
                cursor = nested_content;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, content_start, next_close, next_close + close.len()));
                }
                cursor = next_close + close.len();
            }
        }
    }
}

/// Text content of the first `tag` element.
pub fn xml_text(xml: &str, tag: &str) -> Option<String> {
    let (_, content_start, content_end, _) = find_element(xml, tag, 0)?;
    Some(unescape(xml[content_start..content_end].trim()))
}

/// Text content of every `tag` element, in document order.
pub fn xml_text_all(xml: &str, tag: &str) -> Vec<String> {
    let mut results = Vec::new();
    let mut from = 0;
    while let Some((_, content_start, content_end, end)) = find_element(xml, tag, from) {
        results.push(unescape(xml[content_start..content_end].trim()));
        from = end;
    }
    results
}

/// First `tag` element including its own tags.
pub fn xml_block(xml: &str, tag: &str) -> Option<String> {
    let (start, _, _, end) = find_element(xml, tag, 0)?;
    Some(xml[start..end].to_string())
}

/// Every `tag` element including its own tags.
pub fn xml_blocks(xml: &str, tag: &str) -> Vec<String> {
    let mut results = Vec::new();
    let mut from = 0;
    while let Some((start, _, _, end)) = find_element(xml, tag, from) {
        results.push(xml[start..end].to_string());
        from = end;
    }
    results
}

/// Items of a wrapped list, e.g. the `DBCluster` elements inside
/// `<DBClusters>`. Returns an empty list when the wrapper is absent.
pub fn xml_list(xml: &str, wrapper: &str, item: &str) -> Vec<String> {
    xml_block(xml, wrapper)
        .map(|w| xml_blocks(&w, item))
        .unwrap_or_default()
}

/// Texts of a wrapped list of scalars.
pub fn xml_text_list(xml: &str, wrapper: &str, item: &str) -> Vec<String> {
    xml_block(xml, wrapper)
        .map(|w| xml_text_all(&w, item))
        .unwrap_or_default()
}

pub fn xml_bool(xml: &str, tag: &str) -> Option<bool> {
    xml_text(xml, tag).map(|v| v.eq_ignore_ascii_case("true"))
}

pub fn xml_i32(xml: &str, tag: &str) -> Option<i32> {
    xml_text(xml, tag).and_then(|v| v.parse().ok())
}

pub fn xml_i64(xml: &str, tag: &str) -> Option<i64> {
    xml_text(xml, tag).and_then(|v| v.parse().ok())
}

/// The `<{Action}Result>` element of a response, or the whole body when the
/// wrapper is missing.
pub fn result_block(body: &str, action: &str) -> String {
    xml_block(body, &format!("{}Result", action)).unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_simple() {
        let xml = "<R><DBClusterIdentifier>c1</DBClusterIdentifier></R>";
        assert_eq!(xml_text(xml, "DBClusterIdentifier"), Some("c1".to_string()));
        assert_eq!(xml_text(xml, "Missing"), None);
    }

    #[test]
    fn prefix_tags_are_not_matched() {
        let xml = "<R><DBClusterIdentifier>c1</DBClusterIdentifier><DBCluster><Status>ok</Status></DBCluster></R>";
        let block = xml_block(xml, "DBCluster").unwrap();
        assert!(block.starts_with("<DBCluster>"));
        assert!(block.contains("<Status>ok</Status>"));
    }

    #[test]
    fn text_is_unescaped() {
        let xml = "<R><Description>a &amp; b &lt;c&gt;</Description></R>";
        assert_eq!(xml_text(xml, "Description"), Some("a & b <c>".to_string()));
    }

    #[test]
    fn text_all_multiple() {
        let xml = "<L><AvailabilityZone>a</AvailabilityZone><AvailabilityZone>b</AvailabilityZone></L>";
        assert_eq!(xml_text_all(xml, "AvailabilityZone"), vec!["a", "b"]);
    }

    #[test]
    fn blocks_multiple() {
        let xml = "<R><Item><Id>1</Id></Item><Item><Id>2</Id></Item></R>";
        let blocks = xml_blocks(xml, "Item");
        assert_eq!(blocks.len(), 2);
        assert_eq!(xml_text(&blocks[1], "Id"), Some("2".to_string()));
    }

    #[test]
    fn nested_same_name_elements() {
        let xml = "<R><Node><Node><Id>inner</Id></Node><Id>outer</Id></Node><Tail>t</Tail></R>";
        let block = xml_block(xml, "Node").unwrap();
        assert!(block.ends_with("<Id>outer</Id></Node>"));
        assert_eq!(xml_blocks(xml, "Node").len(), 1);
    }

    #[test]
    fn self_closing_is_empty() {
        let xml = "<R><Marker/><Other>x</Other></R>";
        assert_eq!(xml_text(xml, "Marker"), Some(String::new()));
    }

    #[test]
    fn wrapped_list() {
        let xml = "<R><VpcSecurityGroups><VpcSecurityGroupMembership><VpcSecurityGroupId>sg-1</VpcSecurityGroupId></VpcSecurityGroupMembership></VpcSecurityGroups></R>";
        assert_eq!(xml_list(xml, "VpcSecurityGroups", "VpcSecurityGroupMembership").len(), 1);
        assert!(xml_list(xml, "Absent", "VpcSecurityGroupMembership").is_empty());
    }

    #[test]
    fn typed_helpers() {
        let xml = "<R><MultiAZ>true</MultiAZ><Port>3306</Port><BacktrackWindow>7200</BacktrackWindow></R>";
        assert_eq!(xml_bool(xml, "MultiAZ"), Some(true));
        assert_eq!(xml_i32(xml, "Port"), Some(3306));
        assert_eq!(xml_i64(xml, "BacktrackWindow"), Some(7200));
    }

    #[test]
    fn result_block_falls_back_to_body() {
        let body = "<StartDBClusterResponse><StartDBClusterResult><DBCluster/></StartDBClusterResult></StartDBClusterResponse>";
        assert!(result_block(body, "StartDBCluster").starts_with("<StartDBClusterResult>"));
        assert_eq!(result_block("<Other/>", "StartDBCluster"), "<Other/>");
    }
}
