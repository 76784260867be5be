//! Channel taxonomy
//!
//! The closed, ordered set of category labels shared by the classifier and
//! the sequencer. The order of [`Category::rank`] is the emission order of
//! the final playlist; nothing else in the crate encodes category ordering.

pub mod tables;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use tables::{ClassifierTables, FilterTables, GeographyRule, NationalAliasTable, ThematicRule};

/// Provinces, municipalities, autonomous regions and special territories in
/// their fixed emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Province {
    Beijing,
    Tianjin,
    Hebei,
    Shanxi,
    InnerMongolia,
    Liaoning,
    Jilin,
    Heilongjiang,
    Shanghai,
    Jiangsu,
    Zhejiang,
    Anhui,
    Fujian,
    Jiangxi,
    Shandong,
    Henan,
    Hubei,
    Hunan,
    Guangdong,
    Guangxi,
    Hainan,
    Chongqing,
    Sichuan,
    Guizhou,
    Yunnan,
    Tibet,
    Shaanxi,
    Gansu,
    Qinghai,
    Ningxia,
    Xinjiang,
    HongKong,
    Macau,
    Taiwan,
}

impl Province {
    pub const ALL: [Province; 34] = [
        Province::Beijing,
        Province::Tianjin,
        Province::Hebei,
        Province::Shanxi,
        Province::InnerMongolia,
        Province::Liaoning,
        Province::Jilin,
        Province::Heilongjiang,
        Province::Shanghai,
        Province::Jiangsu,
        Province::Zhejiang,
        Province::Anhui,
        Province::Fujian,
        Province::Jiangxi,
        Province::Shandong,
        Province::Henan,
        Province::Hubei,
        Province::Hunan,
        Province::Guangdong,
        Province::Guangxi,
        Province::Hainan,
        Province::Chongqing,
        Province::Sichuan,
        Province::Guizhou,
        Province::Yunnan,
        Province::Tibet,
        Province::Shaanxi,
        Province::Gansu,
        Province::Qinghai,
        Province::Ningxia,
        Province::Xinjiang,
        Province::HongKong,
        Province::Macau,
        Province::Taiwan,
    ];

    /// Position in [`Province::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn slug(self) -> &'static str {
        match self {
            Province::Beijing => "beijing",
            Province::Tianjin => "tianjin",
            Province::Hebei => "hebei",
            Province::Shanxi => "shanxi",
            Province::InnerMongolia => "inner-mongolia",
            Province::Liaoning => "liaoning",
            Province::Jilin => "jilin",
            Province::Heilongjiang => "heilongjiang",
            Province::Shanghai => "shanghai",
            Province::Jiangsu => "jiangsu",
            Province::Zhejiang => "zhejiang",
            Province::Anhui => "anhui",
            Province::Fujian => "fujian",
            Province::Jiangxi => "jiangxi",
            Province::Shandong => "shandong",
            Province::Henan => "henan",
            Province::Hubei => "hubei",
            Province::Hunan => "hunan",
            Province::Guangdong => "guangdong",
            Province::Guangxi => "guangxi",
            Province::Hainan => "hainan",
            Province::Chongqing => "chongqing",
            Province::Sichuan => "sichuan",
            Province::Guizhou => "guizhou",
            Province::Yunnan => "yunnan",
            Province::Tibet => "tibet",
            Province::Shaanxi => "shaanxi",
            Province::Gansu => "gansu",
            Province::Qinghai => "qinghai",
            Province::Ningxia => "ningxia",
            Province::Xinjiang => "xinjiang",
            Province::HongKong => "hong-kong",
            Province::Macau => "macau",
            Province::Taiwan => "taiwan",
        }
    }

    /// Name used as the playlist group title
    pub fn display_name(self) -> &'static str {
        match self {
            Province::Beijing => "北京",
            Province::Tianjin => "天津",
            Province::Hebei => "河北",
            Province::Shanxi => "山西",
            Province::InnerMongolia => "内蒙古",
            Province::Liaoning => "辽宁",
            Province::Jilin => "吉林",
            Province::Heilongjiang => "黑龙江",
            Province::Shanghai => "上海",
            Province::Jiangsu => "江苏",
            Province::Zhejiang => "浙江",
            Province::Anhui => "安徽",
            Province::Fujian => "福建",
            Province::Jiangxi => "江西",
            Province::Shandong => "山东",
            Province::Henan => "河南",
            Province::Hubei => "湖北",
            Province::Hunan => "湖南",
            Province::Guangdong => "广东",
            Province::Guangxi => "广西",
            Province::Hainan => "海南",
            Province::Chongqing => "重庆",
            Province::Sichuan => "四川",
            Province::Guizhou => "贵州",
            Province::Yunnan => "云南",
            Province::Tibet => "西藏",
            Province::Shaanxi => "陕西",
            Province::Gansu => "甘肃",
            Province::Qinghai => "青海",
            Province::Ningxia => "宁夏",
            Province::Xinjiang => "新疆",
            Province::HongKong => "香港",
            Province::Macau => "澳门",
            Province::Taiwan => "台湾",
        }
    }
}

/// Thematic channel categories in their fixed emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Promotional and one-off event streams
    Event,
    Movie,
    Drama,
    Sports,
    Kids,
    Documentary,
    Music,
    Opera,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Event,
        Theme::Movie,
        Theme::Drama,
        Theme::Sports,
        Theme::Kids,
        Theme::Documentary,
        Theme::Music,
        Theme::Opera,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn slug(self) -> &'static str {
        match self {
            Theme::Event => "event",
            Theme::Movie => "movie",
            Theme::Drama => "drama",
            Theme::Sports => "sports",
            Theme::Kids => "kids",
            Theme::Documentary => "documentary",
            Theme::Music => "music",
            Theme::Opera => "opera",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Event => "活动专区",
            Theme::Movie => "影视",
            Theme::Drama => "剧场",
            Theme::Sports => "体育",
            Theme::Kids => "少儿",
            Theme::Documentary => "纪实",
            Theme::Music => "音乐",
            Theme::Opera => "戏曲",
        }
    }
}

/// A taxonomy label. Every classified entry carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// National network (CCTV-n)
    NationalNetwork,
    /// Provincial satellite networks
    ProvincialNetwork,
    /// Local programs pinned by a trusted source
    Local,
    Province(Province),
    Theme(Theme),
    /// Catch-all
    Other,
}

const PROVINCE_RANK_BASE: usize = 3;
const THEME_RANK_BASE: usize = PROVINCE_RANK_BASE + Province::ALL.len();
const OTHER_RANK: usize = THEME_RANK_BASE + Theme::ALL.len();

impl Category {
    /// Position of the category in the emission order
    pub fn rank(&self) -> usize {
        match self {
            Category::NationalNetwork => 0,
            Category::ProvincialNetwork => 1,
            Category::Local => 2,
            Category::Province(province) => PROVINCE_RANK_BASE + province.index(),
            Category::Theme(theme) => THEME_RANK_BASE + theme.index(),
            Category::Other => OTHER_RANK,
        }
    }

    /// Every label, in rank order
    pub fn all() -> Vec<Category> {
        let mut all = vec![
            Category::NationalNetwork,
            Category::ProvincialNetwork,
            Category::Local,
        ];
        all.extend(Province::ALL.iter().copied().map(Category::Province));
        all.extend(Theme::ALL.iter().copied().map(Category::Theme));
        all.push(Category::Other);
        all
    }

    /// Stable machine label, used in configuration and logs
    pub fn label(&self) -> String {
        match self {
            Category::NationalNetwork => "national-network".to_string(),
            Category::ProvincialNetwork => "provincial-network".to_string(),
            Category::Local => "local".to_string(),
            Category::Province(province) => format!("province:{}", province.slug()),
            Category::Theme(theme) => format!("theme:{}", theme.slug()),
            Category::Other => "other".to_string(),
        }
    }

    /// Human label written as the playlist `group-title`
    pub fn group_title(&self) -> &'static str {
        match self {
            Category::NationalNetwork => "央视",
            Category::ProvincialNetwork => "卫视",
            Category::Local => "本地节目",
            Category::Province(province) => province.display_name(),
            Category::Theme(theme) => theme.display_name(),
            Category::Other => "其他",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the machine label or the group title
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::all()
            .into_iter()
            .find(|category| category.label() == wanted || category.group_title() == s.trim())
            .ok_or_else(|| format!("Unknown channel category: {s}"))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ranks_are_unique_and_follow_all_order() {
        let all = Category::all();
        let ranks: Vec<usize> = all.iter().map(Category::rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(ranks.iter().collect::<HashSet<_>>().len(), all.len());
        assert_eq!(Category::Other.rank(), all.len() - 1);
    }

    #[test]
    fn test_enum_indices_match_const_tables() {
        for (i, province) in Province::ALL.iter().enumerate() {
            assert_eq!(province.index(), i);
        }
        for (i, theme) in Theme::ALL.iter().enumerate() {
            assert_eq!(theme.index(), i);
        }
    }

    #[test]
    fn test_national_before_provincial_before_provinces() {
        assert!(Category::NationalNetwork.rank() < Category::ProvincialNetwork.rank());
        assert!(
            Category::ProvincialNetwork.rank() < Category::Province(Province::Beijing).rank()
        );
        assert!(
            Category::Province(Province::Taiwan).rank() < Category::Theme(Theme::Event).rank()
        );
    }

    #[test]
    fn test_parse_label_and_group_title() {
        assert_eq!(
            "national-network".parse::<Category>().unwrap(),
            Category::NationalNetwork
        );
        assert_eq!("本地节目".parse::<Category>().unwrap(), Category::Local);
        assert_eq!(
            "province:sichuan".parse::<Category>().unwrap(),
            Category::Province(Province::Sichuan)
        );
        assert_eq!(
            "Theme:Event".parse::<Category>().unwrap(),
            Category::Theme(Theme::Event)
        );
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_round_trips_through_label() {
        let json = serde_json::to_string(&Category::Province(Province::HongKong)).unwrap();
        assert_eq!(json, "\"province:hong-kong\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Province(Province::HongKong));
    }
}
