use guard_shared::{sanitize, sanitize_document, sanitize_str, Document};
use serde_json::json;

const CORPUS: &[&str] = &[
    "",
    "   ",
    "Hello <script>alert('xss')</script> World",
    "<SCRIPT SRC=//evil.test/x.js></SCRIPT>",
    "<iframe src=javascript:alert(1)></iframe>",
    "<img src=x onerror=alert(1)//>",
    "<svg/onload=alert(1)>",
    "<a href=\"JaVaScRiPt:alert(1)\">click</a>",
    "<a href='data:text/html;base64,PHNjcmlwdD4='>x</a>",
    "<scr<script>x</script>ipt>alert(1)</scr<script>y</script>ipt>",
    "jajavascript:vascript:alert(1)",
    "onon=x",
    "Fish & Chips \"special\" 'today'",
    "<p>Rich <em>text</em> description</p>",
    "\t\n  padded value \n\t",
];

#[test]
fn test_sanitize_is_idempotent_on_corpus() {
    for input in CORPUS {
        let once = sanitize_str(input);
        assert_eq!(sanitize_str(&once), once, "input: {input:?}");
    }
}

#[test]
fn test_sanitized_corpus_has_no_dangerous_constructs() {
    for input in CORPUS {
        let lower = sanitize_str(input).to_lowercase();
        assert!(!lower.contains("<script>"), "input: {input:?}");
        assert!(!lower.contains("</script>"), "input: {input:?}");
        assert!(!lower.contains("javascript:"), "input: {input:?}");
        assert!(!lower.contains("data:text/html"), "input: {input:?}");
        assert!(!lower.contains("onerror="), "input: {input:?}");
    }
}

#[test]
fn test_plain_text_preserved() {
    assert_eq!(
        sanitize_str("Fish & Chips \"special\" 'today'"),
        "Fish & Chips \"special\" 'today'"
    );
    assert_eq!(
        sanitize_str("<p>Rich <em>text</em> description</p>"),
        "<p>Rich <em>text</em> description</p>"
    );
}

#[test]
fn test_nested_product_payload() {
    let payload = json!({
        "name": "Desk Lamp",
        "description": "<p>Warm light</p><script>track()</script>",
        "variants": [
            {"sku": " LAMP-1 ", "label": "<span onmouseover=\"x()\">Brass</span>"},
            {"sku": "LAMP-2", "label": "Steel", "stock": 4}
        ],
        "seo": {"canonical": "javascript:void(0)", "indexed": true}
    });

    assert_eq!(
        sanitize(payload),
        json!({
            "name": "Desk Lamp",
            "description": "<p>Warm light</p>",
            "variants": [
                {"sku": "LAMP-1", "label": "<span>Brass</span>"},
                {"sku": "LAMP-2", "label": "Steel", "stock": 4}
            ],
            "seo": {"canonical": "void(0)", "indexed": true}
        })
    );
}

#[test]
fn test_document_round_trip_after_sanitize() {
    let doc = Document::from(json!({"title": " <script>x</script>Sale ", "ids": ["a", "b"]}));
    let cleaned = sanitize_document(&doc);
    assert_eq!(
        cleaned.to_value().unwrap(),
        json!({"title": "Sale", "ids": ["a", "b"]})
    );
}

#[test]
fn test_cyclic_document_terminates() {
    let category = Document::object(vec![("name", Document::from("Garden<script></script>"))]);
    let children = Document::array(vec![category.clone()]);
    category.insert("children", children.clone()).unwrap();
    category.insert("parent", category.clone()).unwrap();

    let cleaned = sanitize_document(&category);

    assert_eq!(cleaned.get("name").unwrap().as_str(), Some("Garden"));
    assert!(cleaned.get("parent").unwrap().ptr_eq(&category));
    let cleaned_children = cleaned.get("children").unwrap();
    assert!(cleaned_children.index(0).unwrap().ptr_eq(&category));

    category.clear();
}
