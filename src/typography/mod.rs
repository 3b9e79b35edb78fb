use crate::render::html_escape;
use crate::themes::{MotionPreset, Theme};

/// Fonts the browser already has; never requested from Google Fonts.
const SYSTEM_FONTS: &[&str] = &["system-ui", "serif", "sans-serif", "Georgia", ""];

/// Build CSS custom properties for typography, palette, and motion from a theme.
pub fn build_css_variables(theme: &Theme, motion: &MotionPreset, glass: bool) -> String {
    let glass_bg = if glass {
        "rgba(255, 255, 255, 0.18)"
    } else {
        "transparent"
    };
    let glass_blur = if glass { "blur(12px)" } else { "none" };

    format!(
        r#":root {{
    --font-heading: '{heading}', serif;
    --font-body: '{body}', sans-serif;
    --font-accent: '{accent}', cursive;
    --color-primary: {primary};
    --color-accent: {accent_color};
    --color-bg: {background};
    --color-bg-variant: {background_variant};
    --color-text: {text};
    --color-text-light: {text_light};
    --glass-bg: {glass_bg};
    --glass-blur: {glass_blur};
    --motion-duration: {duration}s;
    --motion-from-opacity: {from_opacity};
    --motion-from-y: {from_y}px;
    --motion-from-scale: {from_scale};
}}"#,
        heading = theme.typography.heading,
        body = theme.typography.body,
        accent = theme.typography.accent,
        primary = theme.colors.primary,
        accent_color = theme.colors.accent,
        background = theme.colors.background,
        background_variant = theme.colors.background_variant,
        text = theme.colors.text,
        text_light = theme.colors.text_light,
        glass_bg = glass_bg,
        glass_blur = glass_blur,
        duration = motion.duration_secs,
        from_opacity = motion.initial.opacity,
        from_y = motion.initial.y,
        from_scale = motion.initial.scale,
    )
}

/// Build the Google Fonts link tags for the theme's three families.
pub fn build_font_links(theme: &Theme) -> String {
    let mut families: Vec<String> = Vec::new();

    let mut maybe_add = |name: &str| {
        if !SYSTEM_FONTS.contains(&name) {
            let family = name.replace(' ', "+");
            if !families.contains(&family) {
                families.push(family);
            }
        }
    };

    maybe_add(&theme.typography.heading);
    maybe_add(&theme.typography.body);
    maybe_add(&theme.typography.accent);

    if families.is_empty() {
        return String::new();
    }

    let params: Vec<String> = families
        .iter()
        .map(|f| format!("family={}:wght@400;600;700", html_escape(f)))
        .collect();

    format!(
        r#"    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
    <link href="https://fonts.googleapis.com/css2?{}&display=swap" rel="stylesheet">
"#,
        params.join("&")
    )
}
