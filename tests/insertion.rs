// =============================================================================
// Insertion pipeline: positions, wrap contexts, content variants
// =============================================================================

use grafter::{Content, Position, parse};

#[test]
fn bottom_then_top_ordering() {
    let mut doc = parse("<html><body><div id=\"t\"></div></body></html>");
    let t = doc.sub_nodes(doc.body().unwrap())[0];

    doc.insert(t, "<i>one</i>", None);
    doc.insert(t, "<i>two</i>", Some("top"));
    assert_eq!(doc.inner_html(t), "<i>two</i><i>one</i>");
}

#[test]
fn position_keyword_is_case_insensitive_with_bottom_fallback() {
    let mut doc = parse("<html><body><div id=\"t\">x</div></body></html>");
    let t = doc.sub_nodes(doc.body().unwrap())[0];

    doc.insert(t, "<b>A</b>", Some("TOP"));
    doc.insert(t, "<b>B</b>", Some("no-such-position"));
    assert_eq!(doc.inner_html(t), "<b>A</b>x<b>B</b>");
}

#[test]
fn before_on_parentless_target_is_a_no_op() {
    let mut doc = parse("<html><body><p>keep</p></body></html>");
    let loose = doc.create_element("div");

    doc.insert(loose, "ignored", Some("before"));
    assert!(doc.parent_of(loose).is_none());
    assert_eq!(doc.inner_html(doc.body().unwrap()), "<p>keep</p>");
}

#[test]
fn position_map_inserts_each_entry_independently() {
    let mut doc = parse("<html><body><div id=\"t\"><span>X</span></div></body></html>");
    let t = doc.sub_nodes(doc.body().unwrap())[0];

    doc.insert(
        t,
        vec![
            (Position::Top, Content::from("A")),
            (Position::Bottom, Content::from("B")),
        ],
        None,
    );
    assert_eq!(doc.inner_html(t), "A<span>X</span>B");
}

#[test]
fn row_markup_needs_the_table_wrap_context() {
    let mut doc = parse("<html><body><table><tbody id=\"tb\"></tbody></table></body></html>");
    let body = doc.body().unwrap();
    let table = doc.sub_nodes(body)[0];
    let tb = doc.sub_nodes(table)[0];

    doc.insert(tb, "<tr><td>Hi</td></tr>", None);
    // no residual wrapper nodes, just the row
    assert_eq!(doc.inner_html(tb), "<tr><td>Hi</td></tr>");
    assert_eq!(doc.inner_html(body), "<table><tbody id=\"tb\"><tr><td>Hi</td></tr></tbody></table>");
}

#[test]
fn cell_markup_into_a_row() {
    let mut doc = parse(
        "<html><body><table><tbody><tr id=\"row\"></tr></tbody></table></body></html>",
    );
    let body = doc.body().unwrap();
    let table = doc.sub_nodes(body)[0];
    let tbody = doc.sub_nodes(table)[0];
    let row = doc.sub_nodes(tbody)[0];

    doc.insert(row, "<td>a</td><td>b</td>", None);
    assert_eq!(doc.inner_html(row), "<td>a</td><td>b</td>");
}

#[test]
fn sibling_insertion_uses_the_parent_context() {
    let mut doc = parse(
        "<html><body><table><tbody><tr id=\"row\"><td>1</td></tr></tbody></table></body></html>",
    );
    let body = doc.body().unwrap();
    let table = doc.sub_nodes(body)[0];
    let tbody = doc.sub_nodes(table)[0];
    let row = doc.sub_nodes(tbody)[0];

    // the new row lands inside tbody, so the row markup must be parsed in
    // tbody's wrap context even though `row` is the target
    doc.insert(row, "<tr><td>0</td></tr>", Some("before"));
    assert_eq!(
        doc.inner_html(tbody),
        "<tr><td>0</td></tr><tr id=\"row\"><td>1</td></tr>"
    );
}

#[test]
fn options_into_a_select() {
    let mut doc = parse("<html><body><select id=\"s\"></select></body></html>");
    let s = doc.sub_nodes(doc.body().unwrap())[0];

    doc.insert(s, "<option>a</option><option>b</option>", None);
    assert_eq!(doc.inner_html(s), "<option>a</option><option>b</option>");
}

#[test]
fn after_between_and_at_the_end() {
    let mut doc = parse("<html><body><ul><li id=\"a\">1</li><li id=\"b\">2</li></ul></body></html>");
    let ul = doc.sub_nodes(doc.body().unwrap())[0];
    let (a, b) = {
        let items = doc.sub_nodes(ul);
        (items[0], items[1])
    };

    doc.insert(a, "<li>1.5</li>", Some("after"));
    doc.insert(b, "<li>3</li>", Some("after"));
    assert_eq!(
        doc.inner_html(ul),
        "<li id=\"a\">1</li><li>1.5</li><li id=\"b\">2</li><li>3</li>"
    );
}

#[test]
fn insert_to_returns_the_inserted_node() {
    let mut doc = parse("<html><body><ul id=\"u\"><li>old</li></ul></body></html>");
    let ul = doc.sub_nodes(doc.body().unwrap())[0];

    let li = doc.create_element("li");
    let text = doc.create_text("new");
    li.append(text, &mut doc.arena);

    let returned = doc.insert_to(li, ul, Some("top"));
    assert_eq!(returned, li);
    assert_eq!(doc.inner_html(ul), "<li>new</li><li>old</li>");
}

#[test]
fn node_and_node_list_content() {
    let mut doc = parse("<html><body><div id=\"src\"><b>1</b><b>2</b></div><div id=\"dst\"></div></body></html>");
    let body = doc.body().unwrap();
    let src = doc.sub_nodes(body)[0];
    let dst = doc.sub_nodes(body)[1];

    let moved = doc.sub_nodes(src);
    doc.insert(dst, moved, None);
    assert_eq!(doc.inner_html(src), "");
    assert_eq!(doc.inner_html(dst), "<b>1</b><b>2</b>");
}

#[test]
fn number_content_is_coerced_to_text() {
    let mut doc = parse("<html><body><div id=\"t\"></div></body></html>");
    let t = doc.sub_nodes(doc.body().unwrap())[0];

    doc.insert(t, 42i64, None);
    assert_eq!(doc.inner_html(t), "42");
}

#[test]
fn fluent_identity_is_preserved() {
    let mut doc = parse("<html><body><div id=\"t\"></div></body></html>");
    let t = doc.sub_nodes(doc.body().unwrap())[0];

    assert_eq!(doc.insert(t, "x", None), t);
    assert_eq!(doc.remove(t), t);
}
