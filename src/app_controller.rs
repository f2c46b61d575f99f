use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::{DocumentFormat, FileManager};
use crate::translation::{ConcurrencyGate, DocumentTranslator, TokenUsageStats, TranslationService};

// @module: Application controller for batch document translation

// @enum: What the run plan decided to do with one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedAction {
    Translate(DocumentFormat),
    CopyAsIs,
    Skip,
}

// @struct: One input file with its planned action and resolved paths
struct PlannedFile {
    relative: PathBuf,
    input_path: PathBuf,
    output_path: PathBuf,
    action: PlannedAction,
}

/// Main application controller for ebook translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Translate every supported file under the input directory into the
    /// output directory, preserving relative paths.
    pub async fn run(&self) -> Result<()> {
        let start_time = std::time::Instant::now();

        let input_dir = PathBuf::from(&self.config.processing.input_dir);
        let output_dir = PathBuf::from(&self.config.processing.output_dir);
        FileManager::ensure_dir(&output_dir)?;

        let plan = self.build_plan(&input_dir, &output_dir)?;
        if plan.is_empty() {
            return Err(anyhow::anyhow!(
                "No files found in input directory: {}",
                input_dir.display()
            ));
        }
        self.log_plan(&plan);

        let service = Arc::new(TranslationService::new(
            self.config.provider.clone(),
            self.config.prompts.clone(),
        ));

        info!("Testing connection to {}", self.config.provider.endpoint);
        service
            .test_connection()
            .await
            .context("Provider connection test failed")?;

        // Copies and skips are settled up front, translations run gated
        let mut copy_count = 0;
        let mut skip_count = 0;
        let mut translate_jobs = Vec::new();
        for file in plan {
            match file.action {
                PlannedAction::Skip => {
                    skip_count += 1;
                }
                PlannedAction::CopyAsIs => {
                    FileManager::copy_file(&file.input_path, &file.output_path)?;
                    copy_count += 1;
                }
                PlannedAction::Translate(format) => {
                    translate_jobs.push((file, format));
                }
            }
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(translate_jobs.len() as u64));
        folder_pb.set_style(Self::progress_style_for(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}",
        ));
        folder_pb.set_message("Translating");

        let gate = ConcurrencyGate::new(self.config.processing.concurrent_files);

        let mut tasks = Vec::new();
        for (file, format) in translate_jobs {
            let service = Arc::clone(&service);
            let config = self.config.clone();
            let gate = gate.clone();
            let multi_progress = multi_progress.clone();
            let folder_pb = folder_pb.clone();

            tasks.push(tokio::spawn(async move {
                let _slot = gate.admit().await;

                let name = file.relative.to_string_lossy().to_string();
                let result = Self::translate_one(&service, &config, &file, format, &multi_progress)
                    .await
                    .with_context(|| format!("Failed to translate {}", name));

                folder_pb.inc(1);
                (name, result)
            }));
        }

        let mut usage = TokenUsageStats::new();
        let mut success_count = 0;
        let mut error_count = 0;
        for joined in join_all(tasks).await {
            match joined {
                Ok((_, Ok(file_usage))) => {
                    usage.absorb(&file_usage);
                    success_count += 1;
                }
                Ok((name, Err(e))) => {
                    error!("Error processing {}: {:#}", name, e);
                    error_count += 1;
                }
                Err(e) => {
                    error!("Translation task panicked: {}", e);
                    error_count += 1;
                }
            }
        }

        folder_pb.finish_with_message("Translation complete");

        let duration = start_time.elapsed();
        info!(
            "Run completed in {}: {} translated, {} copied, {} skipped, {} errors",
            Self::format_duration(duration),
            success_count,
            copy_count,
            skip_count,
            error_count
        );
        info!(
            "Token usage: {} ({:.0} tokens/min)",
            usage.summary(),
            usage.tokens_per_minute()
        );

        if error_count > 0 {
            return Err(anyhow::anyhow!("{} file(s) failed to translate", error_count));
        }
        Ok(())
    }

    // @method: Enumerate input files and decide an action for each
    fn build_plan(&self, input_dir: &PathBuf, output_dir: &PathBuf) -> Result<Vec<PlannedFile>> {
        let mut plan = Vec::new();
        for relative in FileManager::enumerate_files(input_dir)? {
            let input_path = input_dir.join(&relative);
            let output_path = output_dir.join(&relative);

            let action = if FileManager::file_exists(&output_path) {
                PlannedAction::Skip
            } else if FileManager::is_blacklisted(&relative) {
                PlannedAction::CopyAsIs
            } else {
                match DocumentFormat::from_path(&relative) {
                    DocumentFormat::Unsupported => PlannedAction::CopyAsIs,
                    format => PlannedAction::Translate(format),
                }
            };

            plan.push(PlannedFile {
                relative,
                input_path,
                output_path,
                action,
            });
        }
        Ok(plan)
    }

    // @method: Log the decided action per file before starting
    fn log_plan(&self, plan: &[PlannedFile]) {
        info!("Processing plan ({} files):", plan.len());
        for file in plan {
            let label = match file.action {
                PlannedAction::Translate(format) => format!("translate ({:?})", format),
                PlannedAction::CopyAsIs => "copy as-is".to_string(),
                PlannedAction::Skip => "skip (output exists)".to_string(),
            };
            info!("  {} -> {}", file.relative.display(), label);
        }
    }

    // @method: Translate a single planned file with its own progress bar
    async fn translate_one(
        service: &TranslationService,
        config: &Config,
        file: &PlannedFile,
        format: DocumentFormat,
        multi_progress: &MultiProgress,
    ) -> Result<TokenUsageStats> {
        let name = file.relative.to_string_lossy().to_string();
        debug!("Starting translation of {}", name);

        let content = FileManager::read_to_string(&file.input_path)?;

        let file_pb = multi_progress.add(ProgressBar::new(1));
        file_pb.set_style(Self::progress_style_for(
            "  [{bar:30.green/dim}] {pos}/{len} chunks {msg}",
        ));
        file_pb.set_message(name.clone());

        let translator = DocumentTranslator::from_config(service, &config.processing);
        let pb = file_pb.clone();
        let translated = translator
            .translate_document(format, &content, move |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })
            .await?;

        FileManager::write_to_file(&file.output_path, &translated.content)?;

        file_pb.finish_and_clear();
        debug!("Finished {}: {}", name, translated.usage.summary());
        Ok(translated.usage)
    }

    // @method: Build a progress style, degrading gracefully on template errors
    fn progress_style_for(template: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    // @method: Human-readable duration for summary lines
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
