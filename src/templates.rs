//! Embedded HTML template and the renderer that fills it.

use std::sync::Arc;

use anyhow::Result;
use tera::{Context, Tera};

use crate::{Config, DbOutcome, ExtensionList, RequestContext, RuntimeIntrospection, ViewSelector};

// ---

/// Name the page is registered under. The `.html` suffix turns on autoescaping.
const STATUS_TEMPLATE_NAME: &str = "status.html";

/// Hardcoded showcase line; unrelated to what is actually loaded.
pub const COMMON_EXTENSIONS: &str =
    "APCu, BCMath, GD, Imagick, OPcache, PDO MySQL, PDO PostgreSQL, Redis, Sockets, ZIP";

/// Initialize the Tera template engine with the embedded status page.
pub fn init_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(STATUS_TEMPLATE_NAME, STATUS_PAGE)?;
    Ok(tera)
}

/// Everything one render needs, gathered by the handler beforehand.
#[derive(Debug)]
pub struct PageModel {
    pub context: RequestContext,
    pub view: ViewSelector,
    /// Filled only for the extensions view.
    pub extensions: Option<ExtensionList>,
    /// Filled only for the db view.
    pub db: Option<DbOutcome>,
}

/// Status page renderer, built once at startup and shared by all requests.
pub struct StatusPage {
    tera: Tera,
    config: Config,
    runtime: Arc<dyn RuntimeIntrospection>,
}

impl StatusPage {
    // ---
    pub fn new(config: Config, runtime: Arc<dyn RuntimeIntrospection>) -> Result<Self> {
        // ---
        Ok(StatusPage {
            tera: init_templates()?,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runtime(&self) -> &dyn RuntimeIntrospection {
        self.runtime.as_ref()
    }

    /// Build the per-request metadata snapshot.
    pub fn request_context(&self, host_header: Option<String>) -> RequestContext {
        // ---
        RequestContext {
            runtime_version: self.runtime.version(),
            server_software: self.config.server_software.clone(),
            document_root: self.config.document_root.clone(),
            server_name: self.config.server_name.clone(),
            host_header,
            opcode_cache: self.runtime.opcode_cache(),
        }
    }

    /// Render the full HTML document.
    pub fn render(&self, page: &PageModel) -> Result<String> {
        // ---
        let mut context = Context::new();
        context.insert("status", &page.context.status_panel());
        context.insert("view", &page.view);
        context.insert("common_extensions", COMMON_EXTENSIONS);

        // Absent sections go in as null so the template can test them
        context.insert("extensions", &page.extensions);
        context.insert("db", &page.db);

        Ok(self.tera.render(STATUS_TEMPLATE_NAME, &context)?)
    }
}

/// The status page document.
pub const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Runtime Status</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            max-width: 800px;
            background: white;
            border-radius: 10px;
            box-shadow: 0 20px 40px rgba(0,0,0,0.1);
            overflow: hidden;
        }
        .header { background: #333; color: white; padding: 30px; text-align: center; }
        .content { padding: 30px; }
        .info-box {
            background: #f8f9fa;
            padding: 20px;
            border-radius: 8px;
            margin: 20px 0;
            border-left: 4px solid #007bff;
        }
        .status-item {
            display: flex;
            justify-content: space-between;
            padding: 10px 0;
            border-bottom: 1px solid #eee;
        }
        .status-value { font-weight: bold; color: #28a745; }
        .btn {
            display: inline-block;
            padding: 12px 24px;
            background: #007bff;
            color: white;
            text-decoration: none;
            border-radius: 5px;
            margin: 10px 5px;
            transition: background 0.3s;
        }
        .btn:hover { background: #0056b3; }
        .ext-columns { columns: 3; column-gap: 20px; }
        .ext-item { break-inside: avoid; margin-bottom: 5px; }
        .db-ok { color: green; }
        .db-failed { color: red; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Runtime Status</h1>
            <p>Diagnostic landing page for this deployment</p>
        </div>

        <div class="content">
            <div class="info-box" id="status-panel">
                <h2>✅ Application Status</h2>
                <div class="status-item">
                    <span>Runtime Version:</span>
                    <span class="status-value">{{ status.runtime_version }}</span>
                </div>
                <div class="status-item">
                    <span>Server Software:</span>
                    <span class="status-value">{{ status.server_software }}</span>
                </div>
                <div class="status-item">
                    <span>Document Root:</span>
                    <span class="status-value">{{ status.document_root }}</span>
                </div>
                <div class="status-item">
                    <span>Server Name:</span>
                    <span class="status-value">{{ status.server_name }}</span>
                </div>
                <div class="status-item">
                    <span>Host Header:</span>
                    <span class="status-value">{{ status.host_header }}</span>
                </div>
                {%- if status.opcode_cache %}
                <div class="status-item" id="opcode-cache">
                    <span>Opcode Cache:</span>
                    <span class="status-value">{{ status.opcode_cache }}</span>
                </div>
                {%- endif %}
            </div>

            <div class="info-box">
                <h2>🔧 Common Extensions</h2>
                <p>
                    {{ common_extensions }}<br/><br/>
                    <a href="?view=extensions">See all extensions</a>
                </p>
            </div>

            <div style="text-align: center; margin-top: 30px;">
                <a href="?view=db" class="btn">🗄️ Test Database</a>
                <a href="?view=extensions" class="btn">🔧 View Extensions</a>
            </div>
            {%- if view == "extensions" %}

            <div class="info-box" id="extensions" style="margin-top: 30px;">
                <h2>Loaded Extensions</h2>
                <div class="ext-columns">
                    {%- if extensions %}
                    {%- for ext in extensions %}
                    <div class="ext-item"><strong>{{ ext }}</strong></div>
                    {%- endfor %}
                    {%- endif %}
                </div>
            </div>
            {%- endif %}
            {%- if view == "db" and db %}

            <div class="info-box" id="database" style="margin-top: 30px;">
                <h2>Database Connection Test</h2>
                {%- if db.status == "connected" %}
                <p class="db-ok">✅ Database connection successful!</p>
                {%- else %}
                <p class="db-failed">❌ Database connection failed: {{ db.message }}</p>
                {%- endif %}
                <p><strong>Host:</strong> {{ db.host }}<br>
                <strong>Database:</strong> {{ db.database }}<br>
                <strong>Username:</strong> {{ db.username }}<br>
                <strong>SSL/TLS:</strong> {% if db.tls_enabled %}Enabled ✓{% else %}Disabled{% endif %}</p>
            </div>
            {%- endif %}
        </div>
    </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::config::test_config;
    use crate::runtime::tests::StubRuntime;

    fn create_test_page(opcode_cache: Option<bool>) -> StatusPage {
        // ---
        let runtime = StubRuntime {
            extensions: vec!["zip", "json", "pdo"],
            opcode_cache,
        };
        StatusPage::new(test_config(), Arc::new(runtime)).unwrap()
    }

    fn model(page: &StatusPage, view: ViewSelector) -> PageModel {
        // ---
        PageModel {
            context: page.request_context(Some("localhost:8080".to_string())),
            view,
            extensions: None,
            db: None,
        }
    }

    #[test]
    fn test_default_view_has_panel_only() {
        // ---
        let page = create_test_page(None);
        let html = page.render(&model(&page, ViewSelector::Default)).unwrap();

        assert!(html.contains("id=\"status-panel\""));
        assert!(html.contains("9.9.9-test"));
        assert!(html.contains("localhost:8080"));
        assert!(html.contains(COMMON_EXTENSIONS));
        assert!(!html.contains("id=\"extensions\""));
        assert!(!html.contains("id=\"database\""));
        // Server name and document root are unset in the test config
        assert!(html.matches(">Unknown<").count() >= 2);
    }

    #[test]
    fn test_opcode_row_only_when_capability_present() {
        // ---
        let without = create_test_page(None);
        let html = without.render(&model(&without, ViewSelector::Default)).unwrap();
        assert!(!html.contains("Opcode Cache"));

        let with = create_test_page(Some(true));
        let html = with.render(&model(&with, ViewSelector::Default)).unwrap();
        assert!(html.contains("Opcode Cache"));
        assert!(html.contains(">Enabled<"));

        let disabled = create_test_page(Some(false));
        let html = disabled
            .render(&model(&disabled, ViewSelector::Default))
            .unwrap();
        assert!(html.contains(">Disabled<"));
    }

    #[test]
    fn test_extensions_view_sorted_and_escaped() {
        // ---
        let page = create_test_page(None);
        let mut m = model(&page, ViewSelector::Extensions);
        m.extensions = Some(ExtensionList::new(vec![
            "zip".to_string(),
            "json".to_string(),
            "<b>pdo</b>".to_string(),
        ]));

        let html = page.render(&m).unwrap();

        assert!(html.contains("id=\"extensions\""));
        assert!(!html.contains("<b>pdo</b>"));
        assert!(html.contains("<strong>&lt;b&gt;pdo&lt;&#x2F;b&gt;</strong>"));

        let pdo = html.find("<strong>&lt;b&gt;pdo").unwrap();
        let json = html.find("<strong>json</strong>").unwrap();
        let zip = html.find("<strong>zip</strong>").unwrap();
        assert!(pdo < json && json < zip);
        assert_eq!(html.matches("<strong>json</strong>").count(), 1);
    }

    #[test]
    fn test_extensions_view_with_plain_names() {
        // ---
        let page = create_test_page(None);
        let mut m = model(&page, ViewSelector::Extensions);
        m.extensions = Some(ExtensionList::new(page.runtime().loaded_extensions()));

        let html = page.render(&m).unwrap();

        let json = html.find("<strong>json</strong>").unwrap();
        let pdo = html.find("<strong>pdo</strong>").unwrap();
        let zip = html.find("<strong>zip</strong>").unwrap();
        assert!(json < pdo && pdo < zip);
    }

    #[test]
    fn test_db_view_success() {
        // ---
        let page = create_test_page(None);
        let mut m = model(&page, ViewSelector::Db);
        m.db = Some(DbOutcome::Connected {
            host: "db".to_string(),
            database: "apache_php".to_string(),
            username: "apache_php".to_string(),
            tls_enabled: true,
        });

        let html = page.render(&m).unwrap();

        assert!(html.contains("Database connection successful!"));
        assert!(html.contains("<strong>Host:</strong> db<br>"));
        assert!(html.contains("<strong>Database:</strong> apache_php<br>"));
        assert!(html.contains("<strong>Username:</strong> apache_php<br>"));
        assert!(html.contains("Enabled ✓"));
        assert!(!html.contains("id=\"extensions\""));
    }

    #[test]
    fn test_db_view_failure_is_escaped() {
        // ---
        let page = create_test_page(None);
        let mut m = model(&page, ViewSelector::Db);
        m.db = Some(DbOutcome::Failed {
            host: "db".to_string(),
            database: "apache_php".to_string(),
            username: "apache_php".to_string(),
            tls_enabled: false,
            message: "Access denied for user <script>".to_string(),
        });

        let html = page.render(&m).unwrap();

        assert!(html.contains("Database connection failed: Access denied for user &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("successful"));

        // The resolved target is shown even though the attempt failed
        assert!(html.contains("<strong>Host:</strong> db<br>"));
        assert!(html.contains("<strong>Database:</strong> apache_php<br>"));
        assert!(html.contains("<strong>Username:</strong> apache_php<br>"));
        assert!(html.contains("<strong>SSL/TLS:</strong> Disabled</p>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        // ---
        let page = create_test_page(Some(true));
        let m = model(&page, ViewSelector::Default);

        assert_eq!(page.render(&m).unwrap(), page.render(&m).unwrap());
    }
}
