use anyhow::{Context, Result};
use console::{Style, Term};
use derivepass::{ClassSet, GenerationRequest};
use rpassword::read_password;
use std::io::{self, Write};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MIN_SAFE_ENTROPY: f64 = 80.0;
pub const STRONG_ENTROPY: f64 = 128.0;
/// The generator is seeded from a 256-bit digest.
pub const MAX_ENTROPY: f64 = 256.0;

pub const MIN_SAFE_PASSWORD_LENGTH: usize = 12;
pub const MIN_SAFE_CLASS_COUNT: usize = 3;

pub struct GenerationInfo<'a> {
    pub service_char_count: usize,
    pub secret_byte_length: usize,
    pub iteration: u64,
    pub request: &'a GenerationRequest,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_glyphs(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn status_style(color_support: bool, secure: bool) -> Style {
    match (color_support, secure) {
        (false, _) => Style::new(),
        (true, true) => Style::new().green(),
        (true, false) => Style::new().yellow(),
    }
}

fn control_character_positions(s: &str) -> Vec<usize> {
    s.chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos)
        .collect()
}

fn confirm_control_characters(s: &str, input_name: &str) -> Result<()> {
    let positions = control_character_positions(s);
    if positions.is_empty() {
        return Ok(());
    }

    let term = Term::stderr();
    term.write_line(&format!(
        "WARNING: {} contains {} control character(s) at position(s): {}",
        input_name,
        positions.len(),
        positions
            .iter()
            .map(|pos| pos.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))?;
    term.write_str("Continue anyway? [y/N]: ")?;
    term.flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    let response = response.trim().to_lowercase();

    term.clear_last_lines(2)?;

    if response != "y" && response != "yes" {
        anyhow::bail!("Aborted");
    }
    Ok(())
}

/// NFC form of `s`. Leading and trailing whitespace is significant and kept.
pub fn normalize(s: &str) -> String {
    s.nfc().collect()
}

pub fn prepare_input(s: &str, input_name: &str, normalize_input: bool) -> Result<Zeroizing<String>> {
    let prepared = if normalize_input {
        Zeroizing::new(normalize(s))
    } else {
        Zeroizing::new(s.to_string())
    };

    confirm_control_characters(&prepared, input_name)?;
    Ok(prepared)
}

pub fn prompt_secret() -> Result<Zeroizing<String>> {
    eprint!("Secret: ");
    io::stderr().flush()?;

    let secret = Zeroizing::new(read_password().context("Failed to read secret phrase")?);
    Ok(secret)
}

/// Entropy of the sampling step, capped by the seed size.
pub fn sampling_entropy(request: &GenerationRequest) -> f64 {
    let per_class = request.per_class_count() as f64;
    let bits: f64 = request
        .classes
        .iter()
        .map(|class| per_class * (class.alphabet().len() as f64).log2())
        .sum();

    bits.min(MAX_ENTROPY)
}

pub fn display_output(output: &Zeroizing<String>, info: &GenerationInfo<'_>, options: &DisplayOptions) {
    if options.quiet {
        println!("{}", &**output);
        return;
    }

    println!("Out[0]:\n{}\n", &**output);
    display_settings(info, options);
    display_stats(output.chars().count(), info, options);
}

fn display_settings(info: &GenerationInfo<'_>, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_glyphs(options.unicode_support);

    let classes = info.request.classes;
    let classes_secure = classes.len() >= MIN_SAFE_CLASS_COUNT;
    let classes_style = status_style(options.color_support, classes_secure);
    let classes_status = if classes_secure { check_ok } else { check_warn };

    println!("Settings:");
    println!(
        "  {} Service    {} {}",
        branch,
        info.service_char_count,
        plural(info.service_char_count, "char", "chars")
    );
    println!(
        "  {} Secret     {} {}",
        branch,
        info.secret_byte_length,
        plural(info.secret_byte_length, "byte", "bytes")
    );
    println!("  {} Iteration  {}", branch, info.iteration);
    println!("  {} Seed       SHA-256 (base64 composite)", branch);
    println!("  {} Generator  MT19937", branch);
    println!(
        "  {} Classes    {} {} ({})",
        branch,
        classes_style.apply_to(format!("[{}]", classes_status)),
        classes_style.apply_to(classes.len()),
        class_names(classes)
    );
    println!(
        "  {} Output     {} per class, {} {}",
        last,
        info.request.per_class_count(),
        info.request.password_length(),
        plural(info.request.password_length(), "char", "chars")
    );

    println!();
}

fn display_stats(length: usize, info: &GenerationInfo<'_>, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_glyphs(options.unicode_support);

    let entropy = sampling_entropy(info.request);
    let (status_icon, entropy_secure, status_text) = if entropy >= STRONG_ENTROPY {
        (check_ok, true, "Strong")
    } else if entropy >= MIN_SAFE_ENTROPY {
        (check_ok, true, "Fair")
    } else {
        (check_warn, false, "Weak")
    };
    let entropy_style = status_style(options.color_support, entropy_secure);

    let length_secure = length >= MIN_SAFE_PASSWORD_LENGTH;
    let length_style = status_style(options.color_support, length_secure);
    let length_status = if length_secure { check_ok } else { check_warn };

    println!("Stats:");
    println!(
        "  {} Entropy    {} {} bits ({})",
        branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(status_text)
    );
    println!(
        "  {} Length     {} {} {}",
        branch,
        length_style.apply_to(format!("[{}]", length_status)),
        length_style.apply_to(length),
        plural(length, "char", "chars")
    );
    println!(
        "  {} Charset    {} chars",
        last,
        info.request.classes.charset_size()
    );

    println!(
        "\n{} Security: {}",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(status_text)
    );
}

fn class_names(classes: ClassSet) -> String {
    classes
        .iter()
        .map(|class| class.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
