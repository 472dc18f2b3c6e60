use labgen_core::grammar::Syntax;
use labgen_core::metadata::{
    AxisRange, Converters, MetaValue, PLOT_PROPERTIES, CURVE_PROPERTIES, parse_metadata,
};
use labgen_core::templates::{Expander, TemplateRegistry};
use labgen_core::ErrorKind;
use rstest::rstest;

fn registry(source: &str) -> TemplateRegistry {
    let syntax = Syntax::standard().unwrap();
    let mut reg = TemplateRegistry::new();
    reg.load_source(source, &syntax.template_definition).unwrap();
    reg
}

fn expand(reg: &TemplateRegistry, text: &str) -> Result<String, ErrorKind> {
    let syntax = Syntax::standard().unwrap();
    Expander::new(reg, &syntax.template_invocation).expand(text).map_err(|e| e.kind())
}

const BOX: &str = "##box\n++w\n++h=1\n++label=none\n[%%w x %%h : %%label]\n##";

#[rstest]
#[case("#box||w=3|h=4|label=A||", "#box||3|4|A||")]
#[case("#box||label=A|w=3|h=4||", "#box||3|4|A||")]
#[case("#box||w=3||", "#box||3||")]
fn named_and_positional_calls_agree(#[case] named: &str, #[case] positional: &str) {
    let reg = registry(BOX);
    assert_eq!(expand(&reg, named).unwrap(), expand(&reg, positional).unwrap());
}

#[test]
fn omitted_required_parameter_never_expands_to_empty() {
    let reg = registry(BOX);
    assert_eq!(expand(&reg, "#box||h=2||"), Err(ErrorKind::UnresolvedParameter));
}

#[test]
fn self_invocation_and_longer_cycles_fail_cleanly() {
    let reg = registry("##a\n#a||x=1||\n##");
    assert_eq!(expand(&reg, "#a"), Err(ErrorKind::DirectRecursionDetected));

    let reg = registry("##a\n#b\n##\n##b\n#a\n##");
    assert_eq!(expand(&reg, "#a"), Err(ErrorKind::ExpansionDepthExceeded));
}

#[test]
fn plain_template_expands_to_its_body() {
    let reg = registry("##plain\nJust text.\n##\n##padded\n@@wrap-newlines\nJust text.\n##");
    assert_eq!(expand(&reg, "#plain").unwrap(), "Just text.");
    assert_eq!(expand(&reg, "#padded").unwrap(), "\nJust text.\n");
}

#[test]
fn defaults_fill_an_empty_block() {
    let meta = parse_metadata("", &CURVE_PROPERTIES, &Converters::standard()).unwrap();
    assert_eq!(meta.get_str("color"), Some("black"));
    assert_eq!(meta.get_str("style"), Some("lines+points"));
    assert_eq!(meta.get_str("x"), Some("x"));
    assert_eq!(meta.get_str("y"), Some("y"));
    assert_eq!(meta.get_str("scope"), Some(""));
}

#[test]
fn nested_curves_are_finalized_in_order() {
    let text = "curve=c1\n.x=t\n.y=f(t)\ncurve=c2\n.x=u\n.y=g(u)\n";
    let meta = parse_metadata(text, &PLOT_PROPERTIES, &Converters::standard()).unwrap();

    let curves: Vec<_> = meta.objects("curve").collect();
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[0].title, "c1");
    assert_eq!(curves[0].metadata.get_str("y"), Some("f(t)"));
    assert_eq!(curves[0].metadata.get_str("color"), Some("black"));
    assert_eq!(curves[1].title, "c2");
    assert_eq!(curves[1].metadata.get_str("x"), Some("u"));
    assert_eq!(meta.get_range("xrange"), Some(AxisRange::Auto));
    assert_eq!(
        meta.get("axes"),
        Some(&MetaValue::List(vec!["x".to_string(), "y".to_string()]))
    );
}
