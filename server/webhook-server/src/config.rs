//! Server configuration, read from the environment.

use test_harness::HarnessConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const PLACEHOLDER_MAIL_KEY: &str = "your_sendgrid_api_key";

/// Source-hosting API access.
#[derive(Debug, Clone)]
pub struct GithubConfig {
  pub api_url: String,
  pub token: Option<String>,
}

/// Text-completion credentials. Gemini wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct SynthConfig {
  pub gemini_api_key: Option<String>,
  pub openai_api_key: Option<String>,
}

/// Report delivery.
#[derive(Debug, Clone)]
pub struct MailConfig {
  pub api_key: Option<String>,
  pub sender: String,
  /// Where reports go. No recipient, no reports.
  pub recipient: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub port: u16,
  pub github: GithubConfig,
  pub synth: SynthConfig,
  pub mail: MailConfig,
  pub harness: HarnessConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      github: GithubConfig {
        api_url: GITHUB_API_URL.into(),
        token: None,
      },
      synth: SynthConfig::default(),
      mail: MailConfig {
        api_key: None,
        sender: "test@trial.mlsender.net".into(),
        recipient: None,
      },
      harness: HarnessConfig::default(),
    }
  }
}

impl Config {
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      port: env("PORT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.port),
      github: GithubConfig {
        api_url: env("GITHUB_API_URL").unwrap_or(defaults.github.api_url),
        token: env("GITHUB_TOKEN"),
      },
      synth: SynthConfig {
        gemini_api_key: env("GEMINI_API_KEY"),
        openai_api_key: env("OPENAI_API_KEY"),
      },
      mail: MailConfig {
        api_key: env("MAILER_SEND_API_KEY").or_else(|| env("SENDGRID_API_KEY")),
        sender: env("SENDER_EMAIL").unwrap_or(defaults.mail.sender),
        recipient: env("RECIPIENT_EMAIL"),
      },
      harness: HarnessConfig::from_env(),
    }
  }
}

/// Non-empty environment variable.
fn env(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
