//! Ask command implementation.

use anyhow::{Context, Result, bail};
use tempdash_core::DashboardApi;
use tempdash_types::AskReply;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_ask_json, format_ask_text};
use crate::style;
use crate::util::{require_device, write_output};

/// Arguments for the ask command.
pub struct AskArgs<'a> {
    pub device: Option<&'a str>,
    pub default_device: Option<&'a str>,
    pub question: &'a [String],
    pub format: OutputFormat,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_ask(api: &dyn DashboardApi, args: AskArgs<'_>) -> Result<()> {
    let content = ask_output(api, args).await?;
    write_output(&content)
}

async fn ask_output(api: &dyn DashboardApi, args: AskArgs<'_>) -> Result<String> {
    let AskArgs {
        device,
        default_device,
        question,
        format,
        quiet,
        opts,
    } = args;

    let question = question.join(" ");
    let question = question.trim();
    if question.is_empty() {
        bail!("請先選擇設備並輸入問題");
    }
    let device = require_device(api, device, default_device).await?;

    let spinner = (!quiet && format == OutputFormat::Text)
        .then(|| style::asking_spinner(&device.name));

    let result = api.ask(&device.id, question).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let reply = result.context("抱歉，與伺服器連線時發生錯誤。")?;

    if let AskReply::Error(error) = &reply {
        tracing::warn!(device_id = %device.id, error = ?error, "Analysis refused");
    }

    match format {
        OutputFormat::Json => format_ask_json(&device, question, &reply, opts),
        OutputFormat::Text => Ok(format_ask_text(&reply, opts)),
    }
}

#[cfg(test)]
mod tests {
    use tempdash_core::{ApiCall, MockApi};
    use tempdash_types::Device;

    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split(' ').map(String::from).collect()
    }

    #[tokio::test]
    async fn test_ask_joins_and_trims_question() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        let opts = FormatOptions::new(true);
        let question = words("is it hot ");
        let out = ask_output(
            &api,
            AskArgs {
                device: Some("Lab"),
                default_device: None,
                question: &question,
                format: OutputFormat::Text,
                quiet: true,
                opts: &opts,
            },
        )
        .await
        .unwrap();

        assert_eq!(out, "d1: is it hot\n");
        assert!(
            api.calls()
                .contains(&ApiCall::Ask("d1".to_string(), "is it hot".to_string()))
        );
    }

    #[tokio::test]
    async fn test_ask_blank_question_sends_nothing() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        let opts = FormatOptions::new(true);
        let question = words("  ");
        let err = ask_output(
            &api,
            AskArgs {
                device: Some("d1"),
                default_device: None,
                question: &question,
                format: OutputFormat::Text,
                quiet: true,
                opts: &opts,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "請先選擇設備並輸入問題");
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_refusal_is_reported() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        api.set_ask_reply(AskReply::Error(Some("no data".to_string())))
            .await;
        let opts = FormatOptions::new(true);
        let question = words("status");
        let out = ask_output(
            &api,
            AskArgs {
                device: Some("d1"),
                default_device: None,
                question: &question,
                format: OutputFormat::Text,
                quiet: true,
                opts: &opts,
            },
        )
        .await
        .unwrap();
        assert_eq!(out, "發生錯誤: no data\n");
    }
}
