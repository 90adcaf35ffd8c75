/// CSS hooks describing where a feed page keeps its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSelectors {
    /// One element per feed entry.
    pub item: String,
    /// Link inside an entry; the first `<a>` is used when this misses.
    pub link: String,
    /// Element whose text is the entry's timestamp.
    pub timestamp: String,
    /// `id` of the "load more" control.
    pub load_more_id: String,
}

/// Builds the JavaScript snippets evaluated in the feed page
pub struct FeedScripts {
    selectors: FeedSelectors,
}

impl FeedScripts {
    pub fn new(selectors: FeedSelectors) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &FeedSelectors {
        &self.selectors
    }

    /// Returns `[{ link, raw_timestamp }]` for every item element, keeping
    /// empty strings for missing parts so indices match the element count.
    pub fn read_items_script(&self) -> String {
        let item = js_string(&self.selectors.item);
        let link = js_string(&self.selectors.link);
        let timestamp = js_string(&self.selectors.timestamp);

        format!(
            r#"
            (() => {{
                const items = [];
                for (const el of document.querySelectorAll({item})) {{
                    const anchor = el.querySelector({link}) || el.querySelector('a');
                    const stamp = el.querySelector({timestamp});
                    items.push({{
                        link: anchor && anchor.href ? anchor.href : '',
                        raw_timestamp: stamp ? stamp.innerText.trim() : ''
                    }});
                }}
                return items;
            }})()
            "#
        )
    }

    /// Number of item elements currently in the DOM.
    pub fn count_script(&self) -> String {
        format!(
            "document.querySelectorAll({}).length",
            js_string(&self.selectors.item)
        )
    }

    /// Scrolls the "load more" control into view and clicks it. Evaluates to
    /// `false` when the control is absent.
    pub fn reveal_script(&self) -> String {
        let id = js_string(&self.selectors.load_more_id);

        format!(
            r#"
            (() => {{
                const button = document.getElementById({id});
                if (!button) {{
                    return false;
                }}
                button.scrollIntoView({{ block: 'center' }});
                button.click();
                return true;
            }})()
            "#
        )
    }
}

/// Quotes `raw` as a JavaScript string literal.
fn js_string(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| "''".to_string())
}
