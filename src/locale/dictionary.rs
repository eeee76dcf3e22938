//! Static display strings for every supported locale.
//!
//! Each locale's table is an exhaustive `match` over [`TextKey`], so a key
//! missing from any language is a compile error rather than a blank label.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoundariesError, Result};
use crate::locale::Locale;

macro_rules! text_keys {
    ($($variant:ident => $name:literal,)+) => {
        /// A display string identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum TextKey {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl TextKey {
            /// Every key, in table order.
            pub const ALL: &'static [TextKey] = &[$(TextKey::$variant,)+];

            /// The key's stable name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(TextKey::$variant => $name,)+
                }
            }
        }
    };
}

text_keys! {
    SelectLanguage => "selectLanguage",
    Welcome => "welcome",
    AppTitle => "appTitle",
    Subtitle => "subtitle",
    ChooseModule => "chooseModule",
    Module1Title => "module1Title",
    Module1Desc => "module1Desc",
    Module2Title => "module2Title",
    Module2Desc => "module2Desc",
    Module3Title => "module3Title",
    Module3Desc => "module3Desc",
    ParentSettings => "parentSettings",
    HowToPlay => "howToPlay",
    HowToPlayDesc => "howToPlayDesc",
    EnableFeatures => "enableFeatures",
    PermissionDesc => "permissionDesc",
    RequestPermissions => "requestPermissions",
    Requesting => "requesting",
    PermissionsGranted => "permissionsGranted",
    SkipForNow => "skipForNow",
    Continue => "continue",
    PermAudio => "permAudio",
    PermMic => "permMic",
    PermCamera => "permCamera",
    PermNotifications => "permNotifications",
    StatusGranted => "statusGranted",
    StatusDenied => "statusDenied",
    StatusError => "statusError",
    StatusPending => "statusPending",
    TutorialWelcomeTitle => "tutorialWelcomeTitle",
    TutorialWelcomeDesc => "tutorialWelcomeDesc",
    TutorialModulesTitle => "tutorialModulesTitle",
    TutorialModulesDesc => "tutorialModulesDesc",
    TutorialModule1Title => "tutorialModule1Title",
    TutorialModule1Desc => "tutorialModule1Desc",
    TutorialSettingsTitle => "tutorialSettingsTitle",
    TutorialSettingsDesc => "tutorialSettingsDesc",
    TutorialStartTitle => "tutorialStartTitle",
    TutorialStartDesc => "tutorialStartDesc",
    TutorialNext => "tutorialNext",
    TutorialLetsGo => "tutorialLetsGo",
    TutorialSkip => "tutorialSkip",
}

impl FromStr for TextKey {
    type Err = BoundariesError;

    fn from_str(s: &str) -> Result<Self> {
        TextKey::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| BoundariesError::config(format!("unknown text key: {}", s)))
    }
}

/// Look up one display string.
pub fn lookup(locale: Locale, key: TextKey) -> &'static str {
    match locale {
        Locale::En => english(key),
        Locale::Ms => malay(key),
        Locale::Zh => chinese(key),
    }
}

/// The full string table for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
    locale: Locale,
}

impl Dictionary {
    /// Dictionary for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// The dictionary's locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up one string.
    pub fn get(&self, key: TextKey) -> &'static str {
        lookup(self.locale, key)
    }

    /// Every (key, string) pair in table order.
    pub fn entries(&self) -> impl Iterator<Item = (TextKey, &'static str)> + '_ {
        TextKey::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    /// The table keyed by key name, for serialization.
    pub fn to_map(&self) -> BTreeMap<&'static str, &'static str> {
        self.entries().map(|(k, v)| (k.name(), v)).collect()
    }
}

fn english(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        SelectLanguage => "Select Language",
        Welcome => "Welcome! Please choose a language.",
        AppTitle => "Understanding Relationships",
        Subtitle => "Learning About Boundaries & Safety",
        ChooseModule => "Choose a module to start learning!",
        Module1Title => "Relationship Rainbow",
        Module1Desc => "Learn about different people in your life",
        Module2Title => "Safety Decisions",
        Module2Desc => "Learn to stay safe and make good choices",
        Module3Title => "My Body Space",
        Module3Desc => "Learn about personal space and boundaries",
        ParentSettings => "Parent Settings",
        HowToPlay => "How to Play",
        HowToPlayDesc => "Tap a colorful module above to start!",
        EnableFeatures => "Enable Features",
        PermissionDesc => {
            "We need your permission to enable audio, voice, and other interactive features"
        }
        RequestPermissions => "Request Permissions",
        Requesting => "Requesting...",
        PermissionsGranted => "All Permissions Granted!",
        SkipForNow => "Skip for Now",
        Continue => "Continue",
        PermAudio => "Audio",
        PermMic => "Microphone",
        PermCamera => "Camera",
        PermNotifications => "Notifications",
        StatusGranted => "Permission granted",
        StatusDenied => "Permission denied",
        StatusError => "Not available",
        StatusPending => "Waiting for permission",
        TutorialWelcomeTitle => "Welcome, friend!",
        TutorialWelcomeDesc => {
            "Let me show you around. This app helps you learn about people, safety and your body space."
        }
        TutorialModulesTitle => "Three learning modules",
        TutorialModulesDesc => "Each colorful card is a module full of games.",
        TutorialModule1Title => "Start here!",
        TutorialModule1Desc => "Relationship Rainbow is a great first module.",
        TutorialSettingsTitle => "For grown-ups",
        TutorialSettingsDesc => "Parents can change the language and sound here.",
        TutorialStartTitle => "You're ready!",
        TutorialStartDesc => "Tap a module to start playing and learning.",
        TutorialNext => "Next",
        TutorialLetsGo => "Let's Go!",
        TutorialSkip => "Skip tutorial",
    }
}

fn malay(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        SelectLanguage => "Pilih Bahasa",
        Welcome => "Selamat datang! Sila pilih bahasa.",
        AppTitle => "Memahami Hubungan",
        Subtitle => "Belajar Mengenai Batasan & Keselamatan",
        ChooseModule => "Pilih modul untuk mula belajar!",
        Module1Title => "Pelangi Hubungan",
        Module1Desc => "Belajar mengenai orang yang berbeza dalam hidup anda",
        Module2Title => "Keputusan Keselamatan",
        Module2Desc => "Belajar untuk kekal selamat dan buat pilihan bijak",
        Module3Title => "Ruang Badan Saya",
        Module3Desc => "Belajar mengenai ruang peribadi dan batasan",
        ParentSettings => "Tetapan Ibu Bapa",
        HowToPlay => "Cara Bermain",
        HowToPlayDesc => "Ketik modul berwarna di atas untuk bermula!",
        EnableFeatures => "Dayakan Ciri",
        PermissionDesc => {
            "Kami memerlukan kebenaran anda untuk mendayakan audio, suara, dan ciri interaktif lain"
        }
        RequestPermissions => "Minta Kebenaran",
        Requesting => "Sedang meminta...",
        PermissionsGranted => "Semua Kebenaran Diberikan!",
        SkipForNow => "Langkau Buat Masa Ini",
        Continue => "Teruskan",
        PermAudio => "Audio",
        PermMic => "Mikrofon",
        PermCamera => "Kamera",
        PermNotifications => "Pemberitahuan",
        StatusGranted => "Kebenaran diberikan",
        StatusDenied => "Kebenaran ditolak",
        StatusError => "Tidak tersedia",
        StatusPending => "Menunggu kebenaran",
        TutorialWelcomeTitle => "Selamat datang, kawan!",
        TutorialWelcomeDesc => {
            "Mari saya tunjukkan. Aplikasi ini membantu anda belajar tentang orang, keselamatan dan ruang badan anda."
        }
        TutorialModulesTitle => "Tiga modul pembelajaran",
        TutorialModulesDesc => "Setiap kad berwarna ialah modul yang penuh dengan permainan.",
        TutorialModule1Title => "Mula di sini!",
        TutorialModule1Desc => "Pelangi Hubungan ialah modul pertama yang bagus.",
        TutorialSettingsTitle => "Untuk orang dewasa",
        TutorialSettingsDesc => "Ibu bapa boleh menukar bahasa dan bunyi di sini.",
        TutorialStartTitle => "Anda sudah bersedia!",
        TutorialStartDesc => "Ketik modul untuk mula bermain dan belajar.",
        TutorialNext => "Seterusnya",
        TutorialLetsGo => "Jom Mula!",
        TutorialSkip => "Langkau tutorial",
    }
}

fn chinese(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        SelectLanguage => "选择语言",
        Welcome => "欢迎！请选择一种语言。",
        AppTitle => "理解人际关系",
        Subtitle => "学习界限与安全",
        ChooseModule => "选择一个模块开始学习！",
        Module1Title => "关系彩虹",
        Module1Desc => "了解生活中不同的人",
        Module2Title => "安全决定",
        Module2Desc => "学习保持安全并做出明智的选择",
        Module3Title => "我的身体空间",
        Module3Desc => "了解个人空间和界限",
        ParentSettings => "家长设置",
        HowToPlay => "怎么玩",
        HowToPlayDesc => "点击上方的彩色模块开始！",
        EnableFeatures => "启用功能",
        PermissionDesc => "我们需要您的许可来启用音频、语音和其他互动功能",
        RequestPermissions => "请求许可",
        Requesting => "正在请求...",
        PermissionsGranted => "所有许可已授予！",
        SkipForNow => "暂时跳过",
        Continue => "继续",
        PermAudio => "音频",
        PermMic => "麦克风",
        PermCamera => "摄像头",
        PermNotifications => "通知",
        StatusGranted => "许可已授予",
        StatusDenied => "许可被拒绝",
        StatusError => "不可用",
        StatusPending => "等待许可",
        TutorialWelcomeTitle => "欢迎你，小朋友！",
        TutorialWelcomeDesc => "让我带你看看。这个应用帮助你了解身边的人、安全和你的身体空间。",
        TutorialModulesTitle => "三个学习模块",
        TutorialModulesDesc => "每张彩色卡片都是一个充满游戏的模块。",
        TutorialModule1Title => "从这里开始！",
        TutorialModule1Desc => "关系彩虹是很好的第一个模块。",
        TutorialSettingsTitle => "给大人的",
        TutorialSettingsDesc => "家长可以在这里更改语言和声音。",
        TutorialStartTitle => "准备好了！",
        TutorialStartDesc => "点击一个模块开始玩和学习。",
        TutorialNext => "下一步",
        TutorialLetsGo => "出发吧！",
        TutorialSkip => "跳过教程",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_locale_has_every_key() {
        for locale in Locale::ALL {
            let dict = Dictionary::new(locale);
            for &key in TextKey::ALL {
                assert!(
                    !dict.get(key).trim().is_empty(),
                    "{} is empty in {}",
                    key.name(),
                    locale
                );
            }
            assert_eq!(dict.to_map().len(), TextKey::ALL.len());
        }
    }

    #[test]
    fn test_key_set_identical_across_locales() {
        let en: HashSet<_> = Dictionary::new(Locale::En).to_map().into_keys().collect();
        for locale in [Locale::Ms, Locale::Zh] {
            let other: HashSet<_> = Dictionary::new(locale).to_map().into_keys().collect();
            assert_eq!(en, other);
        }
    }

    #[test]
    fn test_key_names_unique() {
        let names: HashSet<_> = TextKey::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), TextKey::ALL.len());
    }

    #[test]
    fn test_lookup_known_strings() {
        assert_eq!(lookup(Locale::En, TextKey::SelectLanguage), "Select Language");
        assert_eq!(lookup(Locale::Ms, TextKey::SelectLanguage), "Pilih Bahasa");
        assert_eq!(lookup(Locale::Zh, TextKey::AppTitle), "理解人际关系");
    }

    #[test]
    fn test_translated_strings_differ_from_english() {
        let en = Dictionary::new(Locale::En);
        let zh = Dictionary::new(Locale::Zh);
        assert_ne!(en.get(TextKey::TutorialNext), zh.get(TextKey::TutorialNext));
    }

    #[test]
    fn test_text_key_from_str() {
        assert_eq!(
            "tutorialWelcomeTitle".parse::<TextKey>().unwrap(),
            TextKey::TutorialWelcomeTitle
        );
        assert_eq!("module1Title".parse::<TextKey>().unwrap(), TextKey::Module1Title);
        assert!("noSuchKey".parse::<TextKey>().is_err());
    }

    #[test]
    fn test_text_key_serde_matches_name() {
        for &key in TextKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.name()));
        }
    }
}
