use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;

use majordomo::{
    execute_command_with_context, AppCommand, AppContext, OutputHook, ToolOutput, ToolRunner,
};

struct FakeRunner {
    replies: Mutex<HashMap<String, VecDeque<ToolOutput>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn queue_reply(&self, program: &str, output: ToolOutput) {
        self.replies
            .lock()
            .expect("replies lock should not be poisoned")
            .entry(program.to_string())
            .or_default()
            .push_back(output);
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(format!("{} {}", program, args.join(" ")));
        let reply = self
            .replies
            .lock()
            .expect("replies lock should not be poisoned")
            .get_mut(program)
            .and_then(|queue| queue.pop_front());
        Ok(reply.unwrap_or_else(|| ToolOutput::ok("")))
    }

    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(format!("spawn {} {}", program, args.join(" ")));
        Ok(())
    }
}

fn unique_temp_path(prefix: &str, suffix: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{}_{}{}", prefix, timestamp, suffix))
}

fn make_test_context(runner: Arc<FakeRunner>) -> (AppContext, Arc<Mutex<Vec<String>>>) {
    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let output_hook: OutputHook = Arc::new(move |line| {
        sink.lock()
            .expect("output lock should not be poisoned")
            .push(line.to_string());
    });

    let context = AppContext::new()
        .with_runner(runner)
        .with_output_hook(output_hook);
    (context, lines)
}

const SAMPLE_ARP: &str = "\
router.lan (192.168.1.1) at 50:c7:bf:aa:bb:cc on en0 ifscope [ethernet]
? (192.168.1.7) at a4:83:e7:1:2:c3 on en0 ifscope [ethernet]
? (192.168.1.255) at ff:ff:ff:ff:ff:ff on en0 ifscope [ethernet]
";

#[tokio::test]
async fn census_command_outputs_classified_devices_as_json() {
    let runner = Arc::new(FakeRunner::new());
    runner.queue_reply("arp", ToolOutput::ok(SAMPLE_ARP));

    let (context, lines) = make_test_context(Arc::clone(&runner));
    // Nonexistent config path: census falls back to defaults.
    let missing_config = unique_temp_path("majordomo_no_config", ".json");

    execute_command_with_context(
        AppCommand::Census {
            config: Some(missing_config),
        },
        &context,
    )
    .await
    .expect("census should succeed");

    let output = lines
        .lock()
        .expect("output lock should not be poisoned")
        .join("\n");
    let parsed: serde_json::Value =
        serde_json::from_str(&output).expect("census output should be valid JSON");

    assert_eq!(parsed["total"], serde_json::json!(2));
    let devices = parsed["devices"].as_array().expect("devices array");
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["ip"], "192.168.1.1");
    assert_eq!(devices[0]["is_gateway"], true);
    assert_eq!(devices[1]["mac"], "A4:83:E7:01:02:C3");
    assert_eq!(devices[1]["manufacturer"], "Apple, Inc.");
}

#[tokio::test]
async fn census_command_fails_when_arp_errors() {
    let runner = Arc::new(FakeRunner::new());
    runner.queue_reply("arp", ToolOutput::failed("arp: permission denied"));

    let (context, _lines) = make_test_context(Arc::clone(&runner));
    let missing_config = unique_temp_path("majordomo_no_config", ".json");

    let err = execute_command_with_context(
        AppCommand::Census {
            config: Some(missing_config),
        },
        &context,
    )
    .await
    .expect_err("failing arp should surface as an error");
    assert!(err.to_string().contains("arp -a exited with an error"));
}

#[tokio::test]
async fn netcheck_command_reports_offline_target_as_json() {
    let config_path = unique_temp_path("majordomo_netcheck_config", ".json");
    std::fs::write(
        &config_path,
        r#"{
            "identity": { "require_passphrase": false },
            "network": {
                "probe_host": "127.0.0.1",
                "probe_port": 9,
                "probe_timeout_secs": 1
            }
        }"#,
    )
    .expect("config file should be writable");

    let runner = Arc::new(FakeRunner::new());
    let (context, lines) = make_test_context(Arc::clone(&runner));

    execute_command_with_context(
        AppCommand::Netcheck {
            config: Some(config_path.clone()),
        },
        &context,
    )
    .await
    .expect("netcheck should succeed");

    let output = lines
        .lock()
        .expect("output lock should not be poisoned")
        .join("\n");
    let parsed: serde_json::Value =
        serde_json::from_str(&output).expect("netcheck output should be valid JSON");

    assert_eq!(parsed["online"], serde_json::Value::Bool(false));
    assert_eq!(parsed["target"], "127.0.0.1:9");

    let _ = std::fs::remove_file(config_path);
}

#[tokio::test]
async fn doctor_command_reports_missing_config_without_failing() {
    let runner = Arc::new(FakeRunner::new());
    for tool in ["osascript", "say", "afplay", "open", "arp"] {
        runner.queue_reply("which", ToolOutput::ok(format!("/usr/bin/{}", tool)));
    }

    let (context, lines) = make_test_context(Arc::clone(&runner));
    let missing_config = unique_temp_path("majordomo_no_config", ".json");

    execute_command_with_context(
        AppCommand::Doctor {
            config: Some(missing_config),
        },
        &context,
    )
    .await
    .expect("doctor should succeed even with failing checks");

    let output = lines
        .lock()
        .expect("output lock should not be poisoned")
        .join("\n");
    let parsed: serde_json::Value =
        serde_json::from_str(&output).expect("doctor output should be valid JSON");

    assert_eq!(parsed["overall_ok"], serde_json::Value::Bool(false));
    let checks = parsed["checks"].as_array().expect("checks array");

    let tool_check = checks
        .iter()
        .find(|c| c["name"] == "tool.say")
        .expect("say tool check present");
    assert_eq!(tool_check["ok"], serde_json::Value::Bool(true));

    let config_check = checks
        .iter()
        .find(|c| c["name"] == "config")
        .expect("config check present");
    assert_eq!(config_check["ok"], serde_json::Value::Bool(false));
}
