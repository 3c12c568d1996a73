use clap::Parser;
use drone_query::utils::{logger, validation::Validate};
use drone_query::{
    CliConfig, HttpQueryService, NormalizedResult, QuerySession, Record, TomlConfig,
};
use serde_json::Value;
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting drone-query CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 建立提交協作者：TOML 配置檔優先於命令列參數
    let service = match &config.config {
        Some(path) => {
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            HttpQueryService::from_config(&file_config)?
        }
        None => HttpQueryService::from_config(&config)?,
    };

    let mut session = QuerySession::new(service);

    // 單次查詢模式：提交失敗以非零碼結束
    if let Some(query) = &config.query {
        session.submit(query).await?;
        render_current(&session);
        return Ok(());
    }

    // 互動模式：Enter 送出查詢，:sort/:reset 操作表格，:quit 離開
    println!("drone-query interactive mode");
    println!("Type a query and press Enter. Commands: :sort <column>, :reset, :quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == ":quit" {
            break;
        }
        if line == ":reset" {
            session.reset_sort();
            render_current(&session);
            continue;
        }
        if let Some(column) = line.strip_prefix(":sort ") {
            session.sort_by(column.trim());
            render_current(&session);
            continue;
        }

        submit_and_render(&mut session, line).await;
    }

    Ok(())
}

async fn submit_and_render<S: drone_query::QueryService>(
    session: &mut QuerySession<S>,
    query: &str,
) {
    match session.submit(query).await {
        Ok(_) => render_current(session),
        Err(e) => {
            tracing::error!("❌ Query failed: {}", e);
            eprintln!("❌ {}", e);
        }
    }
}

fn render_current<S: drone_query::QueryService>(session: &QuerySession<S>) {
    let Some(result) = session.result() else {
        println!("(no data)");
        return;
    };

    // 純量摘要優先顯示
    if let Some(headline) = result.headline() {
        println!("{}", headline);
    }

    if result.has_rows() {
        print_table(result, session.current_rows());
    } else if result.scalar_summary.is_none() {
        match &result.text_summary {
            Some(text) => println!("{}", text),
            None => println!("(no data)"),
        }
    }
}

fn print_table(result: &NormalizedResult, rows: &[Record]) {
    let widths: Vec<usize> = result
        .columns
        .iter()
        .map(|column| {
            rows.iter()
                .map(|row| cell_display(row.get(column)).len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = *width))
        .collect();
    println!("{}", header.join("  "));

    for row in rows {
        let cells: Vec<String> = result
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                format!("{:<width$}", cell_display(row.get(column)), width = *width)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

fn cell_display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
