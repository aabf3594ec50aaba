//! Tests for the structural Twig parser.

use twig_loader::twig::{ExpressionToken, LogicKind, LogicToken, TemplateEngine, Token, TwigEngine};

fn parse(source: &str) -> Vec<Token> {
    TwigEngine.parse(source).unwrap()
}

fn tags(tokens: &[Token]) -> Vec<&LogicToken> {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Logic(tag) => Some(tag),
            _ => None,
        })
        .collect()
}

#[test]
fn test_raw_output_and_logic_tokens() {
    let tokens = parse("<h1>{{ title|upper }}</h1>{% include 'nav.twig' %}");

    assert_eq!(
        tokens[0],
        Token::Raw {
            value: "<h1>".to_string()
        }
    );
    assert!(matches!(&tokens[1], Token::Output { line: 1, .. }));
    let include = tags(&tokens)[0];
    assert_eq!(include.kind, LogicKind::Include);
    assert_eq!(include.stack, vec![ExpressionToken::String("nav.twig".to_string())]);
}

#[test]
fn test_comments_are_dropped() {
    let tokens = parse("{# {% include 'hidden.twig' %} #}visible");
    assert_eq!(tokens.len(), 1);
    assert!(tags(&tokens).is_empty());
}

#[test]
fn test_include_modifiers_are_stripped() {
    let tokens = parse("{% include 'card.twig' ignore missing with { title: 'x' } only %}");
    let include = tags(&tokens)[0];

    assert_eq!(include.stack, vec![ExpressionToken::String("card.twig".to_string())]);
    assert!(include.ignore_missing);
}

#[test]
fn test_nested_bodies() {
    let source = "\
{% for item in items %}
  {% if item.featured %}
    {% include 'featured.twig' %}
  {% else %}
    {% include 'plain.twig' %}
  {% endif %}
{% endfor %}";
    let tokens = parse(source);
    let for_tag = tags(&tokens)[0];
    assert_eq!(for_tag.kind, LogicKind::For);

    let branches = tags(&for_tag.output);
    assert_eq!(branches[0].kind, LogicKind::If);
    assert_eq!(branches[1].kind, LogicKind::Else);

    let plain = tags(&branches[1].output)[0];
    assert_eq!(plain.kind, LogicKind::Include);
    assert_eq!(plain.line, 5);
}

#[test]
fn test_embed_keeps_body() {
    let tokens = parse("{% embed 'panel.twig' %}{% block body %}{% include 'row.twig' %}{% endblock %}{% endembed %}");
    let embed = tags(&tokens)[0];

    assert_eq!(embed.kind, LogicKind::Embed);
    let block = tags(&embed.output)[0];
    assert_eq!(block.kind, LogicKind::Block);
    assert_eq!(tags(&block.output)[0].kind, LogicKind::Include);
}

#[test]
fn test_import_from_self() {
    let tokens = parse("{% import _self as helpers %}{% from 'forms.twig' import input %}");
    let found = tags(&tokens);

    assert_eq!(found[0].kind, LogicKind::Import);
    assert_eq!(found[0].stack, vec![ExpressionToken::SelfReference]);
    assert_eq!(found[1].kind, LogicKind::From);
    assert_eq!(found[1].stack, vec![ExpressionToken::String("forms.twig".to_string())]);
}

#[test]
fn test_set_forms() {
    let tokens = parse("{% set x = 1 %}{% set nav %}{% include 'nav.twig' %}{% endset %}");
    let found = tags(&tokens);

    assert_eq!(found[0].kind, LogicKind::Other("set".to_string()));
    assert_eq!(found[1].kind, LogicKind::Capture);
    assert_eq!(tags(&found[1].output)[0].kind, LogicKind::Include);
}

#[test]
fn test_verbatim_content_is_text() {
    let tokens = parse("{% verbatim %}{% include 'not-a-reference.twig' %}{% endverbatim %}");
    assert!(tags(&tokens).is_empty());
}

#[test]
fn test_syntax_errors_report_line() {
    let err = TwigEngine.parse("line one\n{% if x %}\nno end").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.message.contains("Unclosed `if` tag"));

    let err = TwigEngine.parse("{{ 'unterminated }}").unwrap_err();
    assert_eq!(err.line, 1);

    let err = TwigEngine.parse("{% endfor %}").unwrap_err();
    assert!(err.message.contains("Unexpected `endfor` tag"));

    let err = TwigEngine.parse("{% include %}").unwrap_err();
    assert!(err.message.contains("`include` requires a template name"));
}

#[test]
fn test_extension_tags_parse() {
    let tokens = parse("{% cache 'k' %}{% include 'x.twig' %}{% endcache %}{% frobnicate %}");
    let found = tags(&tokens);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].kind, LogicKind::Other("cache".to_string()));
    assert_eq!(tags(&found[0].output)[0].kind, LogicKind::Include);
    assert_eq!(found[1].kind, LogicKind::Other("frobnicate".to_string()));
    assert!(found[1].output.is_empty());
}

#[test]
fn test_stray_extension_end_tag_is_an_error() {
    let err = TwigEngine.parse("{% endcache %}").unwrap_err();
    assert_eq!(err.message, "Unexpected `endcache` tag");
}
