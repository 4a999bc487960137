//! Template narration for clips the model did not cover.
//!
//! Templates are tried in order; the first whose keywords appear in the clip
//! title wins, and [`DEFAULT_TEMPLATE`] covers everything else.

use autoclip_core::{Clip, Script};

use crate::duration::calculate_duration;

/// Timestamp assumed when a clip has no start or end time.
const ZERO_TIMESTAMP: &str = "00:00:00,000";

/// Audience every template script targets.
pub const TEMPLATE_AUDIENCE: &str = "内容爱好者";

/// Last key point of every template script.
pub const TEMPLATE_VALUE_POINT: &str = "深层价值";

/// Characters of the third transcript line kept as a key point.
const EXCERPT_CHARS: usize = 20;

const CLOSING_PATTERN: &str =
    "这就是{title}的精彩之处，它不仅展现了表面的内容，更蕴含着深刻的意义，值得我们反复品味和思考。";

/// A canned narration pattern. `{title}` and `{reason}` are substituted.
#[derive(Debug)]
pub struct NarrationTemplate {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub emotion_tone: &'static str,
    pub opening: &'static str,
    pub main_content: &'static str,
}

impl NarrationTemplate {
    /// True when the title contains any of this template's keywords.
    pub fn matches(&self, title: &str) -> bool {
        self.keywords.iter().any(|keyword| title.contains(keyword))
    }
}

/// Keyword templates in priority order.
pub static TEMPLATES: [NarrationTemplate; 3] = [
    NarrationTemplate {
        name: "festive",
        keywords: &["节日", "庆典"],
        emotion_tone: "温馨",
        opening: "在这个特别的时刻，{title}正在上演。让我们一起走进这个充满魔力的世界。",
        main_content: "这个片段展现了{title}的独特魅力。{reason}通过细腻的镜头语言和生动的对话，我们能够感受到其中蕴含的深层情感和文化内涵。",
    },
    NarrationTemplate {
        name: "tense",
        keywords: &["冲突", "战斗"],
        emotion_tone: "紧张",
        opening: "紧张的时刻到了！{title}即将展开，让我们看看会发生什么。",
        main_content: "这个片段展现了{title}的激烈场面。{reason}每一个细节都充满了张力和戏剧性，让人屏息凝神。",
    },
    NarrationTemplate {
        name: "heartfelt",
        keywords: &["情感", "感动"],
        emotion_tone: "感动",
        opening: "这是一个关于{title}的动人故事，让我们一起感受其中的温暖。",
        main_content: "这个片段展现了{title}的感人瞬间。{reason}通过细腻的情感表达，触动了我们内心最柔软的地方。",
    },
];

/// Template used when no keyword matches.
pub static DEFAULT_TEMPLATE: NarrationTemplate = NarrationTemplate {
    name: "analytical",
    keywords: &[],
    emotion_tone: "专业",
    opening: "让我们深入探讨{title}这个话题，看看其中隐藏的精彩内容。",
    main_content: "这个片段展现了{title}的精彩内容。{reason}通过专业的分析和深入的解读，我们能够发现其中蕴含的深层价值。",
};

/// Pick the narration template for a title.
pub fn select_template(title: &str) -> &'static NarrationTemplate {
    TEMPLATES
        .iter()
        .find(|template| template.matches(title))
        .unwrap_or(&DEFAULT_TEMPLATE)
}

/// Build a complete script for a clip without calling the model.
pub fn default_script(clip: &Clip) -> Script {
    let title = clip.effective_title();
    let reason = clip.recommend_reason().unwrap_or("");
    let template = select_template(title);

    let total_duration = calculate_duration(
        clip.start_time().unwrap_or(ZERO_TIMESTAMP),
        clip.end_time().unwrap_or(ZERO_TIMESTAMP),
    );

    Script {
        opening: render(template.opening, title, reason),
        main_content: render(template.main_content, title, reason),
        closing: render(CLOSING_PATTERN, title, reason),
        total_duration,
        key_points: key_points(title, &clip.content_lines()),
        emotion_tone: template.emotion_tone.to_string(),
        target_audience: TEMPLATE_AUDIENCE.to_string(),
    }
}

fn key_points(title: &str, content: &[&str]) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let mut points = vec![title.to_string()];
    if let Some(line) = content.get(2) {
        let excerpt: String = line.chars().take(EXCERPT_CHARS).collect();
        points.push(format!("{}...", excerpt));
    }
    points.push(TEMPLATE_VALUE_POINT.to_string());
    points
}

// Substituted text is never rescanned, so a title containing "{reason}" stays literal.
fn render(pattern: &str, title: &str, reason: &str) -> String {
    pattern
        .split("{title}")
        .map(|piece| piece.replace("{reason}", reason))
        .collect::<Vec<_>>()
        .join(title)
}
