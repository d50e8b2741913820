use clap::Args;

use poggit_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.poggit_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push("  db.sqlite:    OK".to_string());
                lines.push("  resources/:   OK".to_string());
                lines.push(format!("  api_port:     {}", state.config.api_port));
                lines.push(format!("  markdown:     {:?}", state.config.markdown));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for probe in ["livez", "readyz"] {
            let url = format!("{}/_status/{}", base.as_str().trim_end_matches('/'), probe);
            let status = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => "OK".to_string(),
                Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                Err(_) => "NOT REACHABLE".to_string(),
            };
            lines.push(format!("  {:<7} {}", format!("{}:", probe), status));
        }

        Ok(lines.join("\n"))
    }
}
