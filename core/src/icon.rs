//! Closed mapping from the icon names used in `tools.json` to something the
//! dashboard can draw. Unknown names fall back to [`Icon::Wrench`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Wrench,
    Image,
    Mail,
    FileText,
    Search,
    Sparkles,
    Globe,
    MessageSquare,
    BarChart,
    Megaphone,
    Zap,
    Calendar,
    Video,
    Database,
    Bot,
}

impl Icon {
    pub const FALLBACK: Icon = Icon::Wrench;

    pub fn from_name(name: &str) -> Self {
        match name {
            "Wrench" => Icon::Wrench,
            "Image" => Icon::Image,
            "Mail" => Icon::Mail,
            "FileText" => Icon::FileText,
            "Search" => Icon::Search,
            "Sparkles" => Icon::Sparkles,
            "Globe" => Icon::Globe,
            "MessageSquare" => Icon::MessageSquare,
            "BarChart" => Icon::BarChart,
            "Megaphone" => Icon::Megaphone,
            "Zap" => Icon::Zap,
            "Calendar" => Icon::Calendar,
            "Video" => Icon::Video,
            "Database" => Icon::Database,
            "Bot" => Icon::Bot,
            _ => Self::FALLBACK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Icon::Wrench => "Wrench",
            Icon::Image => "Image",
            Icon::Mail => "Mail",
            Icon::FileText => "FileText",
            Icon::Search => "Search",
            Icon::Sparkles => "Sparkles",
            Icon::Globe => "Globe",
            Icon::MessageSquare => "MessageSquare",
            Icon::BarChart => "BarChart",
            Icon::Megaphone => "Megaphone",
            Icon::Zap => "Zap",
            Icon::Calendar => "Calendar",
            Icon::Video => "Video",
            Icon::Database => "Database",
            Icon::Bot => "Bot",
        }
    }

    /// Glyph drawn inside the tool card badge.
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Wrench => "🔧",
            Icon::Image => "🖼️",
            Icon::Mail => "✉️",
            Icon::FileText => "📄",
            Icon::Search => "🔍",
            Icon::Sparkles => "✨",
            Icon::Globe => "🌐",
            Icon::MessageSquare => "💬",
            Icon::BarChart => "📊",
            Icon::Megaphone => "📣",
            Icon::Zap => "⚡",
            Icon::Calendar => "📅",
            Icon::Video => "🎬",
            Icon::Database => "🗄️",
            Icon::Bot => "🤖",
        }
    }
}
