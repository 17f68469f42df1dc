//! rotacrypt CLI: key generation and one-off encrypt/decrypt
//!
//! Usage:
//!   rotacrypt keygen <PREFIX> [--cipher AES-256-GCM]
//!   rotacrypt encrypt [--input <file>] [--output <file>]
//!   rotacrypt decrypt [--input <file>] [--output <file>]
//!   rotacrypt inspect <VALUE>
//!
//! Keys come from `ROTACRYPT_KEY`, `ROTACRYPT_KEY_OLD` and `ROTACRYPT_CIPHER`
//! (or the matching flags).

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rotacrypt::config::{ENV_CIPHER, ENV_KEY, ENV_KEY_OLD};
use rotacrypt::{keygen, CipherKind, Encrypter, KeyRingConfig, RotationalEncrypter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rotacrypt", version, about = "Rotating-key symmetric encryption")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a rotating key with a 4-character prefix
    Keygen {
        prefix: String,
        #[arg(long, default_value_t = CipherKind::Aes256Gcm)]
        cipher: CipherKind,
    },
    /// Encrypt with the active key
    Encrypt {
        #[command(flatten)]
        keys: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Decrypt with whichever configured key produced the value
    Decrypt {
        #[command(flatten)]
        keys: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Show which key a value resolves to (no decryption)
    Inspect {
        #[command(flatten)]
        keys: KeyArgs,
        value: String,
    },
}

#[derive(Args)]
struct KeyArgs {
    #[arg(long, env = ENV_KEY, hide_env_values = true)]
    key: String,
    #[arg(long, env = ENV_KEY_OLD, hide_env_values = true)]
    key_old: Option<String>,
    #[arg(long, env = ENV_CIPHER, default_value_t = CipherKind::Aes256Gcm)]
    cipher: CipherKind,
}

impl KeyArgs {
    fn encrypter(&self) -> Result<RotationalEncrypter, rotacrypt::Error> {
        let mut config = KeyRingConfig::new(self.key.clone()).with_cipher(self.cipher);
        if let Some(old) = self.key_old.as_deref().filter(|old| !old.is_empty()) {
            config = config.with_old_key(old);
        }
        RotationalEncrypter::from_config(&config)
    }
}

#[derive(Args)]
struct IoArgs {
    /// Read from this file instead of stdin.
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Write to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl IoArgs {
    fn read(&self) -> io::Result<Vec<u8>> {
        match &self.input {
            Some(path) => fs::read(path),
            None => {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                Ok(buf)
            }
        }
    }

    fn write(&self, data: &[u8]) -> io::Result<()> {
        match &self.output {
            Some(path) => fs::write(path, data),
            None => io::stdout().write_all(data),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(io::stderr)
        .init();

    let result = match &cli.command {
        Command::Keygen { prefix, cipher } => cmd_keygen(prefix, *cipher),
        Command::Encrypt { keys, io } => cmd_encrypt(keys, io),
        Command::Decrypt { keys, io } => cmd_decrypt(keys, io),
        Command::Inspect { keys, value } => cmd_inspect(keys, value),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_keygen(prefix: &str, cipher: CipherKind) -> Result<(), Box<dyn std::error::Error>> {
    let generated = keygen::generate(prefix, cipher)?;

    println!("Base64 ENCODED Version : {}", generated.encoded.as_str());
    println!("Base64 DECODED Version : {}", generated.decoded.as_str());
    eprintln!();
    eprintln!("Tag:    {}", generated.tag);
    eprintln!("Cipher: {}", cipher);
    eprintln!("Move the current key to {} before activating this one.", ENV_KEY_OLD);
    Ok(())
}

fn cmd_encrypt(keys: &KeyArgs, io: &IoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let encrypter = keys.encrypter()?;
    let plaintext = io.read()?;
    let ciphertext = encrypter.encrypt_bytes(&plaintext)?;
    io.write(ciphertext.as_bytes())?;
    Ok(())
}

fn cmd_decrypt(keys: &KeyArgs, io: &IoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let encrypter = keys.encrypter()?;
    let input = io.read()?;
    let ciphertext = std::str::from_utf8(&input)?.trim();
    let plaintext = encrypter.decrypt_bytes(ciphertext)?;
    io.write(&plaintext)?;
    Ok(())
}

fn cmd_inspect(keys: &KeyArgs, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let encrypter = keys.encrypter()?;
    let inspection = encrypter.inspect(value.trim());
    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}
