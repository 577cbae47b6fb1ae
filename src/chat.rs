use crate::engine::RagEngine;
use crate::error::Result;
use crate::params::GenerationParameters;
use pulldown_cmark::{html, Parser};

/// Label prepended to every rendered answer
pub const AGENT_LABEL: &str = "Afina: ";

/// Run one chat turn: query the engine with the message, the active database
/// selection and the active parameters, then shape the raw markdown answer
/// into a labeled HTML fragment.
///
/// Single synchronous round trip: no retry, no streaming. The engine's
/// latency is this call's latency.
pub async fn respond(
    engine: &dyn RagEngine,
    message: &str,
    selected: &[usize],
    params: &GenerationParameters,
) -> Result<String> {
    let raw = engine.query(message, selected, params).await?;
    Ok(format!("{}{}", AGENT_LABEL, render_markdown(&raw)))
}

/// Render markdown prose to an HTML fragment. Fenced code blocks keep their
/// literal content as `<pre><code>` spans, never reflowed into paragraphs.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new(text);
    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockEngine;

    #[test]
    fn test_render_plain_paragraph() {
        assert_eq!(render_markdown("hello world"), "<p>hello world</p>\n");
    }

    #[test]
    fn test_render_fenced_code_block() {
        let out = render_markdown("use this:\n\n```rust\nfn main() {}\n```\n");
        assert!(out.contains("<pre><code"));
        assert!(out.contains("fn main() {}"));
        assert!(out.contains("</code></pre>"));
    }

    #[test]
    fn test_render_inline_emphasis() {
        let out = render_markdown("this is *important*");
        assert!(out.contains("<em>important</em>"));
    }

    #[tokio::test]
    async fn test_response_starts_with_agent_label() {
        let engine = MockEngine::with_answer("The answer is **42**.");
        let params = GenerationParameters::default();
        let response = respond(&engine, "what is the answer?", &[], &params)
            .await
            .unwrap();
        assert!(response.starts_with(AGENT_LABEL));
        assert!(response.contains("<strong>42</strong>"));
    }

    #[tokio::test]
    async fn test_query_passes_selection_and_parameters() {
        let engine = MockEngine::with_answer("ok");
        let params = GenerationParameters {
            n_predict: 16,
            ..Default::default()
        };
        respond(&engine, "hi", &[1, 3], &params).await.unwrap();

        let queries = engine.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, "hi");
        assert_eq!(queries[0].1, vec![1, 3]);
        assert_eq!(queries[0].2.n_predict, 16);
    }
}
