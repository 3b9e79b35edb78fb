use chrono::{NaiveDate, NaiveTime};

use crate::api::ErrorKind;
use crate::designs::decorations::{BackgroundLayer, Placement};
use crate::event_content::EventRenderPlan;
use crate::i18n::Translator;
use crate::invitation::InvitationPage;
use crate::models::media::is_web_url;
use crate::models::rsvp::ALLOWED_REACTIONS;
use crate::themes::{default_theme, MotionPreset, Theme};
use crate::typography;

/// Full HTML document for a guest.
pub fn render_invitation(page: &InvitationPage) -> String {
    let t = page.translator;
    let profile = page.profile;
    let couple = profile.couple_display();
    let profile_id = profile.id.as_deref().unwrap_or(&profile.slug);

    let mut body = String::new();

    if !page.languages.is_empty() {
        body.push_str(&build_language_switcher(page));
    }

    if page.sections.hero {
        body.push_str(&build_hero(page));
    }

    if let Some(countdown) = &page.countdown {
        let label = if countdown.days == 0 {
            t.text_or("countdown", "today", "Today is the day!")
        } else {
            format!(
                "{} {}",
                countdown.days,
                t.text_or("countdown", "days", "days to go")
            )
        };
        body.push_str(&format!(
            "<section class=\"countdown\" data-date=\"{}\"><h2>{}</h2><p class=\"countdown-value\">{}</p><p class=\"countdown-event\">{}</p></section>\n",
            countdown.date,
            html_escape(&t.text_or("countdown", "title", "Counting down")),
            html_escape(&label),
            html_escape(&countdown.event_name),
        ));
    }

    if page.sections.events {
        body.push_str(&format!(
            "<section class=\"events\"><h2>{}</h2>\n",
            html_escape(&t.text_or("events", "title", "Celebrations"))
        ));
        for plan in &page.events {
            body.push_str(&build_event_card(plan, t, profile_id, page.sections.map));
        }
        body.push_str("</section>\n");
    }

    if page.sections.gallery {
        body.push_str(&format!(
            "<section class=\"gallery\"><h2>{}</h2><div class=\"gallery-grid\">",
            html_escape(&t.text_or("gallery", "title", "Moments"))
        ));
        for item in page.gallery.iter().filter(|m| is_web_url(&m.url)) {
            body.push_str(&format!(
                "<figure><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></figure>",
                html_escape(&item.url),
                html_escape(item.caption.as_deref().unwrap_or(""))
            ));
        }
        body.push_str("</div></section>\n");
    }

    if page.sections.rsvp {
        body.push_str(&build_rsvp_form(page, profile_id));
    }

    if page.sections.wishes {
        body.push_str(&build_wishes_form(t, profile_id));
    }

    if let Some(music) = page.music.filter(|u| is_web_url(u)) {
        body.push_str(&format!(
            "<audio class=\"background-music\" src=\"{}\" loop preload=\"none\"></audio>\n",
            html_escape(music)
        ));
    }

    body.push_str("<footer>");
    if page.watermark {
        body.push_str(&format!(
            "<p class=\"watermark\">{} {}</p>",
            html_escape(&t.text_or("footer", "made_with", "Made with")),
            html_escape(&page.site_name)
        ));
    }
    body.push_str("</footer>\n");

    render_document(
        &couple,
        &t.lang,
        page.theme,
        &page.motion,
        page.glass,
        &body,
    )
}

/// A page explaining why the invitation can't be shown. Each kind has its
/// own wording so guests can tell a dead link from an expired one.
pub fn render_error_page(kind: ErrorKind, translator: &Translator) -> String {
    let key = kind.text_key();
    let title = translator.text_or("errors", &format!("{}_title", key), kind.default_title());
    let message = translator.text_or("errors", &format!("{}_body", key), kind.default_body());

    let body = format!(
        r#"<main class="error-page error-{key}">
    <p class="error-code">{code}</p>
    <h1>{title}</h1>
    <p>{message}</p>
</main>
"#,
        key = key,
        code = kind.status_code(),
        title = html_escape(&title),
        message = html_escape(&message),
    );

    let theme = default_theme();
    render_document(
        &title,
        &translator.lang,
        theme,
        &crate::themes::animation_variants(crate::themes::AnimationLevel::None),
        false,
        &body,
    )
}

fn render_document(
    title: &str,
    lang: &str,
    theme: &Theme,
    motion: &MotionPreset,
    glass: bool,
    body: &str,
) -> String {
    let css_vars = typography::build_css_variables(theme, motion, glass);
    let font_links = typography::build_font_links(theme);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
{font_links}    <style>
{css_vars}
{base_css}
    </style>
</head>
<body class="theme-{theme_id}">
{body}<script>
{script}
</script>
</body>
</html>"#,
        lang = html_escape(lang),
        title = html_escape(title),
        font_links = font_links,
        css_vars = css_vars,
        base_css = BASE_CSS,
        theme_id = html_escape(&theme.id),
        body = body,
        script = PAGE_SCRIPT,
    )
}

fn build_language_switcher(page: &InvitationPage) -> String {
    let mut html = String::from("<nav class=\"language-switcher\">");
    for option in &page.languages {
        html.push_str(&format!(
            "<a href=\"?lang={}\" class=\"{}\" hreflang=\"{}\">{}</a>",
            urlencoding_simple(&option.code),
            if option.active { "lang active" } else { "lang" },
            html_escape(&option.code),
            html_escape(&option.native_name)
        ));
    }
    html.push_str("</nav>\n");
    html
}

fn build_hero(page: &InvitationPage) -> String {
    let t = page.translator;
    let profile = page.profile;

    let video = page
        .hero_video
        .filter(|u| is_web_url(u))
        .map(|url| {
            format!(
                "<video class=\"hero-video\" src=\"{}\" autoplay muted loop playsinline></video>",
                html_escape(url)
            )
        })
        .unwrap_or_default();

    let date = profile
        .event_date
        .map(|d| format!("<p class=\"hero-date\">{}</p>", format_date(d)))
        .unwrap_or_default();

    let venue = if profile.venue.trim().is_empty() {
        String::new()
    } else {
        format!("<p class=\"hero-venue\">{}</p>", html_escape(&profile.venue))
    };

    format!(
        r#"<header class="hero">{video}
    <p class="hero-invite">{invite}</p>
    <h1 class="couple"><span>{bride}</span> <span class="amp">&amp;</span> <span>{groom}</span></h1>
    <p class="hero-greeting">{greeting}</p>
    {date}{venue}
</header>
"#,
        video = video,
        invite = html_escape(&t.text_or("hero", "invite_line", "Together with their families")),
        bride = html_escape(profile.bride_name.trim()),
        groom = html_escape(profile.groom_name.trim()),
        greeting = html_escape(&t.text_or("greetings", "title", "invite you to celebrate")),
        date = date,
        venue = venue,
    )
}

fn build_event_card(plan: &EventRenderPlan, t: &Translator, profile_id: &str, show_map: bool) -> String {
    let event = plan.event;
    let design_id = plan.design.map(|d| d.id).unwrap_or("none");
    let type_label = t.text_or("event_types", event.event_type.as_str(), event.event_type.as_str());

    let mut html = format!(
        "<article class=\"event-card design-{}\" id=\"event-{}\" style=\"{}\">\n",
        html_escape(design_id),
        html_escape(&event.event_id),
        html_escape(&background_css(&plan.background))
    );

    html.push_str(&build_decorations("flower", &plan.flowers));
    html.push_str(&build_decorations("bell", &plan.bells));
    html.push_str(&build_decorations("lamp", &plan.lamps));

    if let Some(lord) = plan.lord {
        html.push_str(&format!(
            "<img class=\"lord\" src=\"{}\" alt=\"{}\">\n",
            html_escape(lord.image),
            html_escape(lord.name)
        ));
    }

    html.push_str(&format!(
        "<p class=\"event-type\">{}</p><h3>{}</h3>\n",
        html_escape(&type_label),
        html_escape(&event.name)
    ));

    let mut when = Vec::new();
    if let Some(date) = event.date {
        when.push(format_date(date));
    }
    match (event.start_time, event.end_time) {
        (Some(start), Some(end)) => when.push(format!("{} – {}", format_time(start), format_time(end))),
        (Some(start), None) => when.push(format_time(start)),
        _ => {}
    }
    if !when.is_empty() {
        html.push_str(&format!("<p class=\"event-when\">{}</p>\n", html_escape(&when.join(" · "))));
    }

    if !event.venue_name.is_empty() || !event.venue_address.is_empty() {
        html.push_str(&format!(
            "<p class=\"event-venue\"><strong>{}</strong><br>{}</p>\n",
            html_escape(&event.venue_name),
            html_escape(&event.venue_address)
        ));
    }
    if show_map {
        if let Some(link) = event.map_link.as_deref().filter(|l| is_web_url(l)) {
            html.push_str(&format!(
                "<a class=\"event-map\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>\n",
                html_escape(link),
                html_escape(&t.text_or("events", "map", "View map"))
            ));
        }
    }

    if !event.description.trim().is_empty() {
        html.push_str(&format!(
            "<p class=\"event-description\">{}</p>\n",
            html_escape(&event.description)
        ));
    }

    if !plan.content.is_empty() {
        html.push_str("<dl class=\"event-content\">");
        for field in &plan.content {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>",
                html_escape(&t.text("content", field.field.key())),
                html_escape(&field.value)
            ));
        }
        html.push_str("</dl>\n");
    }

    if let Some(video) = plan.hero_video.filter(|u| is_web_url(u)) {
        html.push_str(&format!(
            "<video class=\"event-video\" src=\"{}\" controls preload=\"none\"></video>\n",
            html_escape(video)
        ));
    }

    if !plan.gallery.is_empty() {
        html.push_str("<div class=\"event-gallery\">");
        for item in plan.gallery.iter().filter(|m| is_web_url(&m.url)) {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                html_escape(&item.url),
                html_escape(item.caption.as_deref().unwrap_or(""))
            ));
        }
        html.push_str("</div>\n");
    }

    if plan.show_reactions {
        html.push_str(&format!(
            "<div class=\"reactions\" data-endpoint=\"/i/{}/events/{}/reactions\">",
            urlencoding_simple(profile_id),
            urlencoding_simple(&event.event_id)
        ));
        for emoji in ALLOWED_REACTIONS {
            html.push_str(&format!("<button type=\"button\" class=\"reaction\">{}</button>", emoji));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</article>\n");
    html
}

fn build_decorations(kind: &str, placements: &[Placement]) -> String {
    placements
        .iter()
        .map(|p| {
            format!(
                "<span class=\"decoration {kind}\" style=\"left:{x:.1}%;top:{y:.1}%;color:{color};width:{size}px;height:{size}px;transform:translate(-50%,-50%) rotate({rot}deg)\"></span>\n",
                kind = kind,
                x = p.x,
                y = p.y,
                color = html_escape(&p.color),
                size = p.size,
                rot = p.rotation,
            )
        })
        .collect()
}

/// CSS `background` with the layers topmost first.
fn background_css(layers: &[BackgroundLayer]) -> String {
    if layers.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = layers.iter().map(|l| l.css.as_str()).collect();
    format!("background: {};", parts.join(", "))
}

fn build_rsvp_form(page: &InvitationPage, profile_id: &str) -> String {
    let t = page.translator;
    let options: String = page
        .events
        .iter()
        .map(|plan| {
            format!(
                "<label><input type=\"checkbox\" name=\"event_ids\" value=\"{}\" checked> {}</label>",
                html_escape(&plan.event.event_id),
                html_escape(&plan.event.name)
            )
        })
        .collect();

    format!(
        r#"<section class="rsvp">
    <h2>{title}</h2>
    <form class="guest-form" data-endpoint="/i/{id}/rsvp" data-kind="rsvp">
        <input name="guest_name" placeholder="{name}" maxlength="60" required>
        <input name="phone" type="tel" placeholder="{phone}" required>
        <label><input type="radio" name="attending" value="true" checked> {yes}</label>
        <label><input type="radio" name="attending" value="false"> {no}</label>
        <input name="guest_count" type="number" min="1" max="10" value="1" aria-label="{guests}">
        <div class="rsvp-events">{options}</div>
        <textarea name="message" maxlength="500" placeholder="{message}"></textarea>
        <button type="submit">{submit}</button>
        <p class="form-status" role="status"></p>
    </form>
</section>
"#,
        title = html_escape(&t.text_or("rsvp", "title", "Will you join us?")),
        id = urlencoding_simple(profile_id),
        name = html_escape(&t.text_or("rsvp", "name", "Your name")),
        phone = html_escape(&t.text_or("rsvp", "phone", "Phone with country code")),
        yes = html_escape(&t.text_or("rsvp", "attending", "Joyfully accept")),
        no = html_escape(&t.text_or("rsvp", "not_attending", "Regretfully decline")),
        guests = html_escape(&t.text_or("rsvp", "guests", "Number of guests")),
        options = options,
        message = html_escape(&t.text_or("rsvp", "message", "A note for the couple")),
        submit = html_escape(&t.text_or("rsvp", "submit", "Send RSVP")),
    )
}

fn build_wishes_form(t: &Translator, profile_id: &str) -> String {
    format!(
        r#"<section class="wishes">
    <h2>{title}</h2>
    <form class="guest-form" data-endpoint="/i/{id}/wishes" data-kind="wishes">
        <input name="guest_name" placeholder="{name}" maxlength="60" required>
        <textarea name="message" maxlength="300" placeholder="{message}" required></textarea>
        <button type="submit">{submit}</button>
        <p class="form-status" role="status"></p>
    </form>
</section>
"#,
        title = html_escape(&t.text_or("wishes", "title", "Send your blessings")),
        id = urlencoding_simple(profile_id),
        name = html_escape(&t.text_or("wishes", "name", "Your name")),
        message = html_escape(&t.text_or("wishes", "message", "Your wishes")),
        submit = html_escape(&t.text_or("wishes", "submit", "Send wishes")),
    )
}

fn format_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn urlencoding_simple(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", b));
            }
        }
    }
    result
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: var(--font-body); color: var(--color-text); background: var(--color-bg); }
h1, h2, h3 { font-family: var(--font-heading); color: var(--color-primary); }
.hero { min-height: 80vh; display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; position: relative; overflow: hidden; padding: 48px 16px; }
.hero-video { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; opacity: 0.35; z-index: -1; }
.couple { font-size: clamp(2.2rem, 7vw, 4.5rem); margin: 12px 0; }
.couple .amp { font-family: var(--font-accent); color: var(--color-accent); }
.hero-invite, .hero-greeting { color: var(--color-text-light); letter-spacing: 0.08em; }
section { max-width: 880px; margin: 0 auto; padding: 48px 16px; text-align: center; }
.event-card { position: relative; overflow: hidden; margin: 24px 0; padding: 40px 24px; border-radius: 18px; background-color: var(--color-bg-variant); backdrop-filter: var(--glass-blur); }
.event-card > *:not(.decoration) { position: relative; z-index: 1; }
.decoration { position: absolute; z-index: 0; border-radius: 50%; background: currentColor; opacity: 0.55; pointer-events: none; }
.decoration.bell { border-radius: 50% 50% 12% 12%; }
.decoration.lamp { border-radius: 50% 50% 50% 0; }
.lord { display: block; width: 96px; height: 96px; margin: 0 auto 12px; object-fit: contain; }
.event-type { text-transform: uppercase; letter-spacing: 0.12em; color: var(--color-accent); font-size: 0.8rem; }
.event-content { display: grid; grid-template-columns: auto 1fr; gap: 6px 16px; text-align: left; max-width: 520px; margin: 16px auto 0; }
.event-content dt { color: var(--color-text-light); }
.gallery-grid, .event-gallery { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 8px; }
.gallery-grid img, .event-gallery img { width: 100%; aspect-ratio: 1; object-fit: cover; border-radius: 8px; }
.guest-form { display: grid; gap: 12px; max-width: 480px; margin: 0 auto; }
.guest-form input, .guest-form textarea { padding: 10px 12px; border: 1px solid var(--color-accent); border-radius: 8px; font: inherit; background: var(--glass-bg); }
.guest-form button { padding: 12px; border: none; border-radius: 999px; background: var(--color-primary); color: #fff; font: inherit; cursor: pointer; }
.reactions { margin-top: 16px; }
.reaction { border: none; background: none; font-size: 1.4rem; cursor: pointer; }
.language-switcher { position: fixed; top: 12px; right: 12px; z-index: 10; display: flex; gap: 8px; }
.language-switcher .lang { padding: 4px 10px; border-radius: 999px; background: var(--glass-bg); color: var(--color-text); text-decoration: none; }
.language-switcher .lang.active { background: var(--color-primary); color: #fff; }
.countdown-value { font-size: 2rem; font-family: var(--font-accent); color: var(--color-accent); }
footer { text-align: center; padding: 32px 16px; color: var(--color-text-light); font-size: 0.85rem; }
.error-page { max-width: 560px; margin: 15vh auto; text-align: center; padding: 0 16px; }
.error-code { font-size: 3rem; color: var(--color-accent); margin: 0; }
[data-animate] { opacity: var(--motion-from-opacity); transform: translateY(var(--motion-from-y)) scale(var(--motion-from-scale)); transition: all var(--motion-duration) ease-out; }
[data-animate].in { opacity: 1; transform: none; }
"#;

const PAGE_SCRIPT: &str = r#"
document.querySelectorAll('section, .event-card').forEach(function (el) { el.setAttribute('data-animate', ''); });
var io = new IntersectionObserver(function (entries) {
    entries.forEach(function (e) { if (e.isIntersecting) { e.target.classList.add('in'); io.unobserve(e.target); } });
});
document.querySelectorAll('[data-animate]').forEach(function (el) { io.observe(el); });

document.querySelectorAll('.guest-form').forEach(function (form) {
    form.addEventListener('submit', function (ev) {
        ev.preventDefault();
        var data = new FormData(form);
        var body = { guest_name: data.get('guest_name'), message: data.get('message') || null };
        if (form.dataset.kind === 'rsvp') {
            body.phone = data.get('phone');
            body.attending = data.get('attending') === 'true';
            body.guest_count = parseInt(data.get('guest_count') || '1', 10);
            body.event_ids = data.getAll('event_ids');
        }
        var status = form.querySelector('.form-status');
        fetch(form.dataset.endpoint, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) })
            .then(function (r) { return r.json().then(function (j) { return { ok: r.ok, body: j }; }); })
            .then(function (res) {
                if (res.ok) { form.reset(); status.textContent = '✓'; return; }
                var errs = res.body.errors || [];
                status.textContent = errs.length ? errs.map(function (e) { return e.message; }).join(' · ') : (res.body.error || '');
            })
            .catch(function () { status.textContent = ''; });
    });
});

document.querySelectorAll('.reactions').forEach(function (box) {
    box.querySelectorAll('.reaction').forEach(function (btn) {
        btn.addEventListener('click', function () {
            fetch(box.dataset.endpoint, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify({ emoji: btn.textContent }) }).catch(function () {});
            btn.classList.add('sent');
        });
    });
});

var music = document.querySelector('.background-music');
if (music) { document.addEventListener('click', function () { music.play().catch(function () {}); }, { once: true }); }
"#;
