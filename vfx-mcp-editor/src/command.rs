//! Typed construction of ffmpeg argument lists and filter graphs.
//!
//! Commands are plain argument vectors; nothing here touches a process. The
//! engine prepends `-hide_banner -y` when it runs them.

use std::fmt;
use std::path::Path;

// =============================================================================
// FfmpegCommand
// =============================================================================

/// An ffmpeg invocation, minus the binary and global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfmpegCommand {
    args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single raw argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag followed by its value.
    pub fn opt(self, flag: &str, value: impl ToString) -> Self {
        self.arg(flag).arg(value.to_string())
    }

    /// Append `-i <path>`.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.arg("-i").arg(path)
    }

    /// Append `-filter_complex <graph>`.
    pub fn filter_complex(self, graph: &FilterGraph) -> Self {
        self.opt("-filter_complex", graph.render())
    }

    /// Append `-vf <chain>`.
    pub fn video_filter(self, chain: impl Into<String>) -> Self {
        self.opt("-vf", chain.into())
    }

    /// Append `-af <chain>`.
    pub fn audio_filter(self, chain: impl Into<String>) -> Self {
        self.opt("-af", chain.into())
    }

    /// Append `-map <spec>`. Bare labels are wrapped in brackets.
    pub fn map(self, spec: &str) -> Self {
        if spec.contains(':') || spec.starts_with('[') {
            self.opt("-map", spec)
        } else {
            self.opt("-map", format!("[{}]", spec))
        }
    }

    /// Re-encode with H.264/AAC in a widely playable pixel format.
    pub fn h264_aac(self) -> Self {
        self.opt("-c:v", "libx264")
            .opt("-pix_fmt", "yuv420p")
            .opt("-c:a", "aac")
    }

    /// Append the output path; by convention the last argument.
    pub fn output(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.arg(path)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether `flag` is immediately followed by `value`.
    pub fn has_pair(&self, flag: &str, value: &str) -> bool {
        self.args
            .windows(2)
            .any(|w| w[0] == flag && w[1] == value)
    }

    /// The value following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .windows(2)
            .find(|w| w[0] == flag)
            .map(|w| w[1].as_str())
    }

    /// Number of `-i` inputs.
    pub fn input_count(&self) -> usize {
        self.args.iter().filter(|a| *a == "-i").count()
    }
}

impl fmt::Display for FfmpegCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                if a.is_empty() || a.contains([' ', '\'', '"', ';', '[']) {
                    format!("'{}'", a.replace('\'', "'\\''"))
                } else {
                    a.clone()
                }
            })
            .collect();
        write!(f, "ffmpeg {}", quoted.join(" "))
    }
}

// =============================================================================
// Filter graphs
// =============================================================================

/// One labelled chain of a `-filter_complex` graph: `[in]f1,f2[out]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    inputs: Vec<String>,
    filters: Vec<String>,
    outputs: Vec<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain fed by a single pad, e.g. `0:v` or a label.
    pub fn on(input: impl Into<String>) -> Self {
        Self::new().input(input)
    }

    pub fn input(mut self, label: impl Into<String>) -> Self {
        self.inputs.push(label.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for input in &self.inputs {
            out.push('[');
            out.push_str(input);
            out.push(']');
        }
        out.push_str(&self.filters.join(","));
        for output in &self.outputs {
            out.push('[');
            out.push_str(output);
            out.push(']');
        }
        out
    }
}

/// A complete `-filter_complex` graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: FilterChain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn render(&self) -> String {
        self.chains
            .iter()
            .map(FilterChain::render)
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Render `name=k1=v1:k2=v2`. An empty option list yields the bare name.
pub fn filter(name: &str, options: &[(&str, String)]) -> String {
    if options.is_empty() {
        return name.to_string();
    }
    let opts: Vec<String> = options
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{}={}", name, opts.join(":"))
}

/// Format a number for a filter argument without trailing noise.
///
/// `2.0` renders as `2`, `0.25` as `0.25`, and values are rounded to six
/// decimals so float artefacts such as `0.30000000000000004` do not leak.
pub fn num(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

fn backslash_escape(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a value embedded as a filter option inside a filter graph.
///
/// ffmpeg unescapes twice: once for the option list (`\ ' :`) and once for
/// the graph (`\ ' [ ] , ;`).
pub fn escape_filter_value(value: &str) -> String {
    let option_level = backslash_escape(value, &['\\', '\'', ':']);
    backslash_escape(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

/// Escape a path for a `file '...'` line of a concat demuxer list.
pub fn escape_concat_path(path: &str) -> String {
    path.replace('\'', "'\\''")
}
