//! HTML to Markdown transcoding for WordPress-rendered bodies.
//!
//! Regex-driven and deliberately narrow: WordPress `content.rendered`
//! is machine-generated, so a small set of passes covers it. Output
//! conventions: ATX headings, `-` bullets, `*emphasis*`, `__strong__`,
//! fenced code blocks. Embedded players (iframes) become embed-card
//! anchors the destination front end renders as cards.

use regex::{Captures, Regex};

/// Convert one rendered HTML body to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = html.to_string();

    // Remove scripts and styles
    let script_pattern = Regex::new(r"(?s)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = Regex::new(r"(?s)<style[^>]*>.*?</style>").unwrap();
    text = script_pattern.replace_all(&text, "").to_string();
    text = style_pattern.replace_all(&text, "").to_string();

    // Unwrap iframes sitting alone in a block element, then turn every
    // iframe into an embed-card anchor. Anchors are parked behind
    // placeholders so the later passes cannot touch their markup.
    let wrapped_iframe_pattern = Regex::new(
        r"(?s)<(?:div|p|figure)[^>]*>\s*((?:<iframe[^>]*>\s*(?:</iframe>)?\s*)+)</(?:div|p|figure)>",
    )
    .unwrap();
    text = wrapped_iframe_pattern.replace_all(&text, "$1").to_string();

    let mut embeds: Vec<String> = Vec::new();
    let iframe_pattern =
        Regex::new(r#"(?s)<iframe[^>]*src=["']([^"']+)["'][^>]*>\s*(?:</iframe>)?"#).unwrap();
    text = iframe_pattern
        .replace_all(&text, |caps: &Captures| {
            let full_src = &caps[1];
            let src = full_src.split('?').next().unwrap_or(full_src);
            let index = embeds.len();
            embeds.push(format!(
                r#"<a href="{src}" class="embedly-card" data-card-width="100%" data-card-controls="0">Embedded content: {src}</a>"#
            ));
            format!("\n\n\u{0}embed{index}\u{0}\n\n")
        })
        .to_string();

    // Code blocks before anything else rewrites their content
    let pre_code_pattern =
        Regex::new(r"(?s)<pre[^>]*>\s*<code[^>]*>(.*?)</code>\s*</pre>").unwrap();
    text = pre_code_pattern
        .replace_all(&text, "\n\n```\n$1\n```\n\n")
        .to_string();
    let code_pattern = Regex::new(r"(?s)<code[^>]*>(.*?)</code>").unwrap();
    text = code_pattern.replace_all(&text, "`$1`").to_string();

    // Convert headings (ATX style)
    for level in 1..=6 {
        let heading_pattern =
            Regex::new(&format!(r"(?s)<h{level}[^>]*>(.*?)</h{level}>")).unwrap();
        let hashes = "#".repeat(level);
        text = heading_pattern
            .replace_all(&text, format!("\n\n{hashes} $1\n\n").as_str())
            .to_string();
    }

    // Citations: emphasized, with the decorative dash prefix dropped
    let cite_pattern = Regex::new(r"(?s)<cite[^>]*>(.*?)</cite>").unwrap();
    text = cite_pattern
        .replace_all(&text, |caps: &Captures| {
            let content = caps[1].replacen("– ", "", 1);
            format!("*{}*", content.trim())
        })
        .to_string();

    // Convert emphasis
    let strong_pattern = Regex::new(r"(?s)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)>").unwrap();
    text = strong_pattern.replace_all(&text, "__${1}__").to_string();
    let em_pattern = Regex::new(r"(?s)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)>").unwrap();
    text = em_pattern.replace_all(&text, "*$1*").to_string();

    // Convert images, then links (so linked images nest correctly)
    let img_pattern = Regex::new(r"<img[^>]*>").unwrap();
    let src_pattern = Regex::new(r#"src\s*=\s*["']([^"']+)["']"#).unwrap();
    let alt_pattern = Regex::new(r#"alt\s*=\s*["']([^"']*)["']"#).unwrap();
    text = img_pattern
        .replace_all(&text, |caps: &Captures| {
            let tag = &caps[0];
            let src = src_pattern
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            let alt = alt_pattern
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            format!("![{alt}]({src})")
        })
        .to_string();
    let link_pattern =
        Regex::new(r#"(?s)<a[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap();
    text = link_pattern.replace_all(&text, "[$2]($1)").to_string();

    // Convert lists
    let li_pattern = Regex::new(r"(?s)<li[^>]*>(.*?)</li>").unwrap();
    text = li_pattern.replace_all(&text, "- $1\n").to_string();

    // Convert paragraphs, line breaks and rules
    let br_pattern = Regex::new(r"<br\s*/?>").unwrap();
    text = br_pattern.replace_all(&text, "\n").to_string();
    let p_pattern = Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap();
    text = p_pattern.replace_all(&text, "$1\n\n").to_string();
    let hr_pattern = Regex::new(r"<hr[^>]*/?>").unwrap();
    text = hr_pattern.replace_all(&text, "\n\n---\n\n").to_string();

    // Quote blocks: prefix every line of the content
    let blockquote_pattern = Regex::new(r"(?s)<blockquote[^>]*>(.*?)</blockquote>").unwrap();
    text = blockquote_pattern
        .replace_all(&text, |caps: &Captures| {
            let mut quoted = String::from("\n\n");
            for line in caps[1].trim().lines() {
                let line = line.trim();
                if line.is_empty() {
                    quoted.push_str(">\n");
                } else {
                    quoted.push_str("> ");
                    quoted.push_str(line);
                    quoted.push('\n');
                }
            }
            quoted.push('\n');
            quoted
        })
        .to_string();

    // Remove remaining tags (drops <u> and other unstyled markup)
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, "").to_string();

    text = decode_entities(&text);

    // Clean up whitespace
    let trailing_space = Regex::new(r"[ \t]+\n").unwrap();
    text = trailing_space.replace_all(&text, "\n").to_string();
    let multi_newline = Regex::new(r"\n{3,}").unwrap();
    text = multi_newline.replace_all(&text, "\n\n").to_string();
    text = text.trim().to_string();

    // Bring the embed anchors back
    for (index, embed) in embeds.iter().enumerate() {
        text = text.replace(&format!("\u{0}embed{index}\u{0}"), embed);
    }

    text
}

/// Decode the HTML entities WordPress actually emits: the named set
/// plus decimal and hex numeric references.
pub fn decode_entities(text: &str) -> String {
    let numeric_pattern = Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").unwrap();
    let text = numeric_pattern.replace_all(text, |caps: &Captures| {
        let body = &caps[1];
        let code = match body.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => body.parse::<u32>(),
        };
        match code.ok().and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });

    text.replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&hellip;", "\u{2026}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&rsquo;", "\u{2019}")
        .replace("&ldquo;", "\u{201c}")
        .replace("&rdquo;", "\u{201d}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Clean a title or description for a plain-text field: decode
/// entities, drop stray double quotes, collapse space runs.
pub fn sanitize_string(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let mut out = String::with_capacity(decoded.len());
    let mut prev_space = false;
    for ch in decoded.chars() {
        if ch == '"' {
            continue;
        }
        if ch == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        out.push(ch);
    }
    out.trim().to_string()
}
