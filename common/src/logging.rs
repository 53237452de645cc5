//  Copyright 2026. The Ringnote Developers
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::path::Path;

use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};

/// Initialize logging from a log4rs YAML file if one exists at `path`, otherwise fall back to a
/// sane default: info-level to stdout, debug-level to a rotating file beside the data directory.
pub fn initialize_logging(path: &Path, data_dir: &Path, default_level: &str) -> Result<(), String> {
    if path.exists() {
        log4rs::init_file(path, Default::default()).map_err(|e| e.to_string())?;
        return Ok(());
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}")))
        .build();

    let log_file = data_dir.join("log").join("ringnote.log");
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}")))
        .build(&log_file)
        .map_err(|e| e.to_string())?;

    let level = default_level.parse().unwrap_or(log::LevelFilter::Info);

    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .logger(Logger::builder().build("ringnote_core", log::LevelFilter::Debug))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(level),
        )
        .map_err(|e| e.to_string())?;

    log4rs::init_config(config).map_err(|e| e.to_string())?;
    Ok(())
}

/// Write out a default log4rs YAML config file for the user to customize, mirroring
/// `initialize_logging`'s fallback behaviour.
pub fn install_default_logfile(path: &Path, data_dir: &Path) -> std::io::Result<()> {
    let log_path = data_dir.join("log").join("ringnote.log");
    let contents = format!(
        "refresh_rate: 30 seconds\n\
         appenders:\n\
         \x20\x20stdout:\n\
         \x20\x20\x20\x20kind: console\n\
         \x20\x20file:\n\
         \x20\x20\x20\x20kind: file\n\
         \x20\x20\x20\x20path: \"{}\"\n\
         root:\n\
         \x20\x20level: info\n\
         \x20\x20appenders:\n\
         \x20\x20\x20\x20- stdout\n\
         \x20\x20\x20\x20- file\n",
        log_path.display()
    );
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn install_default_logfile_writes_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("log4rs.yml");
        install_default_logfile(&config_path, dir.path()).unwrap();
        let contents = std::fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("appenders"));
    }
}
