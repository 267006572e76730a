//! HTML rendering for the panel.
//!
//! The host displays the returned document in a web view. Buttons carry their
//! insertable text in `data-text`, so nothing user-provided ever lands inside
//! a script string.

use crate::config::GroupItem;
use crate::message::TRAY_GROUP_INDEX;
use std::fs;
use std::path::Path;

/// Placeholder used when the stylesheet cannot be read
pub const MISSING_STYLES: &str = "/* Styles could not be loaded */";

/// One collapsible section, ready to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub title: String,
    /// Value posted back as `groupIndex` when the header is clicked
    pub wire_index: i64,
    pub expanded: bool,
    pub items: Vec<GroupItem>,
}

impl SectionView {
    fn dom_id(&self) -> String {
        if self.wire_index == TRAY_GROUP_INDEX {
            "recent".to_string()
        } else {
            self.wire_index.to_string()
        }
    }

    fn is_tray(&self) -> bool {
        self.wire_index == TRAY_GROUP_INDEX
    }
}

/// Everything the panel shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub info_banner: bool,
    pub tray: Option<SectionView>,
    pub groups: Vec<SectionView>,
}

impl PanelView {
    fn is_empty(&self) -> bool {
        self.tray.is_none() && self.groups.iter().all(|g| g.items.is_empty())
    }
}

/// Read the stylesheet, falling back to a placeholder comment.
pub fn load_styles(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return MISSING_STYLES.to_string();
    };

    match fs::read_to_string(path) {
        Ok(css) => css,
        Err(e) => {
            tracing::warn!("Failed to load styles from {}: {}", path.display(), e);
            MISSING_STYLES.to_string()
        }
    }
}

/// Render the complete panel document.
pub fn render_html(view: &PanelView, styles: &str) -> String {
    if view.is_empty() {
        return render_empty_state(styles);
    }

    let mut body = String::new();
    if view.info_banner {
        body.push_str(INFO_BANNER);
    }
    if let Some(tray) = &view.tray {
        render_section(&mut body, tray);
    }
    for group in &view.groups {
        render_section(&mut body, group);
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n{head}<body>\n{body}{script}</body>\n</html>\n",
        head = head(styles),
        body = body,
        script = SCRIPT,
    )
}

fn render_empty_state(styles: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n{head}<body>\n\
         <div class=\"empty-state\">\n\
         <h3>No items to show</h3>\n\
         <p>All groups are currently empty.</p>\n\
         <div class=\"settings-hint\">Open Settings and search for \"QuickChars\" to add custom groups and items.</div>\n\
         </div>\n</body>\n</html>\n",
        head = head(styles),
    )
}

fn head(styles: &str) -> String {
    format!(
        "<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <style>{}</style>\n</head>\n",
        styles.replace("</style", "<\\/style")
    )
}

fn render_section(out: &mut String, section: &SectionView) {
    let id = section.dom_id();
    let collapsed = if section.expanded { "" } else { " collapsed" };

    out.push_str("<div class=\"group-section\">\n");
    out.push_str(&format!(
        "<div class=\"group-header\" data-group-index=\"{}\" data-target=\"{}\"><h3>{}</h3>",
        section.wire_index,
        id,
        escape_html(&section.title)
    ));
    if section.is_tray() {
        out.push_str("<span class=\"clear-link\" data-action=\"clear\">Clear</span>");
    }
    out.push_str(&format!(
        "<span class=\"collapse-icon{}\" id=\"icon-{}\">&#9660;</span></div>\n",
        collapsed, id
    ));
    out.push_str(&format!(
        "<div class=\"group-content{}\" id=\"content-{}\">\n",
        collapsed, id
    ));
    out.push_str(&format!(
        "<div class=\"button-container {}\">",
        container_class(&section.items)
    ));
    for item in &section.items {
        let class = if item.is_snippet {
            "snippet-button"
        } else {
            "char-button"
        };
        out.push_str(&format!(
            "<button class=\"{}\" data-text=\"{}\" data-label=\"{}\">{}</button>",
            class,
            escape_html(&item.text),
            escape_html(&item.label),
            escape_html(&item.label)
        ));
    }
    out.push_str("</div>\n</div>\n</div>\n");
}

/// Layout class for a button container, by its mix of item kinds
fn container_class(items: &[GroupItem]) -> &'static str {
    let has_snippets = items.iter().any(|i| i.is_snippet);
    let has_characters = items.iter().any(|i| !i.is_snippet);
    match (has_snippets, has_characters) {
        (true, false) => "snippet-container",
        (true, true) => "mixed-container",
        _ => "char-container",
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INFO_BANNER: &str = "<div class=\"info-banner\">\n\
<div class=\"title\">Default Configuration Example</div>\n\
<div class=\"description\">This is a sample configuration to get you started. For the best experience, customize your own groups and items.</div>\n\
<span class=\"settings-link\" data-action=\"openSettings\">Click here to open QuickChars Settings</span>\n\
</div>\n";

const SCRIPT: &str = r#"<script>
const vscode = acquireVsCodeApi();
document.addEventListener('click', (event) => {
  const button = event.target.closest('button[data-text]');
  if (button) {
    vscode.postMessage({ command: 'insert', text: button.dataset.text, label: button.dataset.label });
    return;
  }
  const action = event.target.closest('[data-action]');
  if (action) {
    event.stopPropagation();
    if (action.dataset.action === 'clear') {
      vscode.postMessage({ command: 'clearRecentlyUsed' });
    } else if (action.dataset.action === 'openSettings') {
      vscode.postMessage({ command: 'openSettings' });
    }
    return;
  }
  const header = event.target.closest('.group-header');
  if (header) {
    const id = header.dataset.target;
    const content = document.getElementById('content-' + id);
    const icon = document.getElementById('icon-' + id);
    const isExpanded = content.classList.toggle('collapsed') === false;
    icon.classList.toggle('collapsed', !isExpanded);
    vscode.postMessage({
      command: 'toggleGroup',
      groupIndex: Number(header.dataset.groupIndex),
      isExpanded: isExpanded
    });
  }
});
</script>
"#;
