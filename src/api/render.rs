use minijinja::Environment;
use serde::Serialize;

use crate::knowledge::{DocumentSource, KnowledgeBase};

const INDEX_TEMPLATE_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

#[derive(Serialize)]
struct PageView<'a> {
    message: Option<&'a str>,
    document: Option<&'a DocumentSource>,
    characters: usize,
}

/// Renders the single application page. Output is HTML-escaped.
#[derive(Debug)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        message: Option<&str>,
        knowledge: &KnowledgeBase,
    ) -> Result<String, minijinja::Error> {
        let view = PageView {
            message,
            document: knowledge.source.as_ref(),
            characters: knowledge.content.chars().count(),
        };
        self.env.get_template(INDEX_TEMPLATE_NAME)?.render(view)
    }
}
