//! Page elements the runner touches directly.

/// Id of the element that shows loading progress and init failures.
pub const STATUS_ELEMENT_ID: &str = "loading-status";

/// Write `text` into the status element. Returns false when the page has no
/// such element; the caller degrades the init report instead of failing.
pub fn set_status(element_id: &str, text: &str) -> bool {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(element_id));

    match element {
        Some(element) => {
            element.set_text_content(Some(text));
            true
        }
        None => {
            log::error!("missing #{element_id} element, status display disabled");
            false
        }
    }
}

/// Status line for a load summary.
pub fn progress_text(loaded: usize, failed: usize, requested: usize) -> String {
    if failed > 0 {
        format!("Loaded {loaded}/{requested} textures ({failed} failed)")
    } else {
        format!("Loaded {loaded}/{requested} textures")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_mentions_failures_only_when_present() {
        assert_eq!(progress_text(3, 0, 5), "Loaded 3/5 textures");
        assert_eq!(progress_text(3, 1, 5), "Loaded 3/5 textures (1 failed)");
    }
}
