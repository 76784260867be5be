//! Built-in keyword and alias tables
//!
//! Tables are plain values: they are built once, optionally extended from
//! configuration, and then shared read-only by the classifier and the foreign
//! filter. All keywords are stored lower-cased so matching can be done against
//! a lower-cased name.

use std::cmp::Ordering;
use std::fmt;

use super::{Province, Theme};

/// Ordinal of a national network channel, e.g. `13` or `5+`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NationalOrdinal {
    pub number: u32,
    pub plus: bool,
}

impl NationalOrdinal {
    pub const fn new(number: u32) -> Self {
        Self {
            number,
            plus: false,
        }
    }

    pub const fn plus(number: u32) -> Self {
        Self { number, plus: true }
    }

    /// Find the first digit run in `text` and read it as an ordinal.
    ///
    /// A run directly followed by `k`/`K` is a resolution tag (`4K`, `8K`) and
    /// yields `None`; a run directly followed by `+` yields a plus ordinal.
    pub fn find_in(text: &str) -> Option<Self> {
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let rest = &text[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let number: u32 = rest[..end].parse().ok()?;
        match rest[end..].chars().next() {
            Some('k') | Some('K') => None,
            Some('+') => Some(Self::plus(number)),
            _ => Some(Self::new(number)),
        }
    }
}

impl fmt::Display for NationalOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plus {
            write!(f, "{}+", self.number)
        } else {
            write!(f, "{}", self.number)
        }
    }
}

/// Result of looking a name up in the national alias table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalMatch {
    /// `None` when the name is clearly national but names no known channel
    pub ordinal: Option<NationalOrdinal>,
}

/// Alias dictionary for the numbered national channels
#[derive(Debug, Clone)]
pub struct NationalAliasTable {
    network: String,
    markers: Vec<String>,
    /// Sorted longest alias first so substring matching is deterministic
    aliases: Vec<(String, NationalOrdinal)>,
    ordinals: Vec<NationalOrdinal>,
}

impl NationalAliasTable {
    pub fn new<I, S>(network: &str, markers: I, aliases: Vec<(NationalOrdinal, Vec<&str>)>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().to_lowercase())
            .collect();

        let mut ordinals: Vec<NationalOrdinal> = aliases.iter().map(|(ord, _)| *ord).collect();
        ordinals.sort();
        ordinals.dedup();

        let mut flat: Vec<(String, NationalOrdinal)> = aliases
            .into_iter()
            .flat_map(|(ord, names)| names.into_iter().map(move |n| (n.to_lowercase(), ord)))
            .collect();
        flat.sort_by(|a, b| match b.0.chars().count().cmp(&a.0.chars().count()) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });

        Self {
            network: network.to_string(),
            markers,
            aliases: flat,
            ordinals,
        }
    }

    pub fn is_known(&self, ordinal: NationalOrdinal) -> bool {
        self.ordinals.binary_search(&ordinal).is_ok()
    }

    /// Ordinal of a display name, only when it names a channel in the table
    pub fn known_ordinal_in(&self, name: &str) -> Option<NationalOrdinal> {
        NationalOrdinal::find_in(name).filter(|ordinal| self.is_known(*ordinal))
    }

    /// Canonical display name for an ordinal, e.g. `CCTV-13`
    pub fn canonical_name(&self, ordinal: NationalOrdinal) -> String {
        format!("{}-{}", self.network, ordinal)
    }

    /// Look up an already lower-cased name.
    ///
    /// Exact alias matches are tried first, then markers and aliases as
    /// substrings. Digits found after a marker take precedence over the
    /// ordinal implied by an alias.
    pub fn lookup(&self, lowered: &str) -> Option<NationalMatch> {
        let trimmed = lowered.trim();
        if let Some((_, ordinal)) = self.aliases.iter().find(|(alias, _)| alias == trimmed) {
            return Some(NationalMatch {
                ordinal: Some(*ordinal),
            });
        }

        let marker_end = self
            .markers
            .iter()
            .filter_map(|marker| trimmed.find(marker.as_str()).map(|pos| (pos, pos + marker.len())))
            .min()
            .map(|(_, end)| end);
        let alias_hit = self
            .aliases
            .iter()
            .find(|(alias, _)| trimmed.contains(alias.as_str()))
            .map(|(_, ordinal)| *ordinal);

        if marker_end.is_none() && alias_hit.is_none() {
            return None;
        }

        let from_digits = marker_end
            .and_then(|end| NationalOrdinal::find_in(&trimmed[end..]))
            .filter(|ordinal| self.is_known(*ordinal));

        Some(NationalMatch {
            ordinal: from_digits.or(alias_hit),
        })
    }
}

/// Thematic category with its exclusion guard
#[derive(Debug, Clone)]
pub struct ThematicRule {
    pub theme: Theme,
    pub keywords: Vec<String>,
    /// General-purpose keywords that suppress this thematic match
    pub exclusions: Vec<String>,
}

impl ThematicRule {
    pub fn new(theme: Theme, keywords: &[&str], exclusions: &[&str]) -> Self {
        Self {
            theme,
            keywords: lowered(keywords),
            exclusions: lowered(exclusions),
        }
    }

    /// True when a keyword matches and no exclusion does
    pub fn matches(&self, lowered_name: &str) -> bool {
        contains_any(lowered_name, &self.keywords) && !contains_any(lowered_name, &self.exclusions)
    }
}

/// Province with the name fragments that identify it
#[derive(Debug, Clone)]
pub struct GeographyRule {
    pub province: Province,
    pub keywords: Vec<String>,
}

impl GeographyRule {
    pub fn new(province: Province, keywords: &[&str]) -> Self {
        Self {
            province,
            keywords: lowered(keywords),
        }
    }
}

/// Every table the classifier consults, in evaluation order
#[derive(Debug, Clone)]
pub struct ClassifierTables {
    pub national: NationalAliasTable,
    pub provincial_network_keywords: Vec<String>,
    pub thematic: Vec<ThematicRule>,
    pub geography: Vec<GeographyRule>,
}

impl Default for ClassifierTables {
    fn default() -> Self {
        Self::builtin()
    }
}

const GENERAL_PURPOSE: &[&str] = &[
    "综合", "新闻", "生活", "公共", "都市", "民生", "经济", "新农村",
];

impl ClassifierTables {
    pub fn builtin() -> Self {
        let national = NationalAliasTable::new(
            "CCTV",
            ["cctv", "央视", "中央"],
            vec![
                (NationalOrdinal::new(1), vec!["中央一套", "央视一套", "央视综合", "中央综合"]),
                (NationalOrdinal::new(2), vec!["中央二套", "央视二套", "央视财经", "中央财经"]),
                (NationalOrdinal::new(3), vec!["中央三套", "央视三套", "央视综艺"]),
                (NationalOrdinal::new(4), vec!["中央四套", "央视四套", "央视中文国际"]),
                (NationalOrdinal::new(5), vec!["中央五套", "央视五套", "央视体育"]),
                (NationalOrdinal::plus(5), vec!["央视体育赛事", "中央五套加", "cctv5plus"]),
                (NationalOrdinal::new(6), vec!["中央六套", "央视六套", "央视电影"]),
                (NationalOrdinal::new(7), vec!["中央七套", "央视七套", "央视国防军事", "央视军事"]),
                (NationalOrdinal::new(8), vec!["中央八套", "央视八套", "央视电视剧"]),
                (NationalOrdinal::new(9), vec!["中央九套", "央视九套", "央视纪录"]),
                (NationalOrdinal::new(10), vec!["中央十套", "央视十套", "央视科教"]),
                (NationalOrdinal::new(11), vec!["中央十一套", "央视十一套", "央视戏曲"]),
                (NationalOrdinal::new(12), vec!["中央十二套", "央视十二套", "央视社会与法"]),
                (NationalOrdinal::new(13), vec!["中央十三套", "央视十三套", "央视新闻"]),
                (NationalOrdinal::new(14), vec!["中央十四套", "央视十四套", "央视少儿"]),
                (NationalOrdinal::new(15), vec!["中央十五套", "央视十五套", "央视音乐"]),
                (NationalOrdinal::new(16), vec!["中央十六套", "央视十六套", "央视奥林匹克"]),
                (NationalOrdinal::new(17), vec!["中央十七套", "央视十七套", "央视农业农村"]),
            ],
        );

        let thematic = vec![
            ThematicRule::new(
                Theme::Event,
                &["春晚", "晚会", "活动", "专题", "发布会"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(
                Theme::Movie,
                &["影视", "电影", "影院", "movie", "cinema"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(
                Theme::Drama,
                &["电视剧", "剧场", "经典剧", "剧集", "drama"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(
                Theme::Sports,
                &["体育", "足球", "篮球", "高尔夫", "网球", "赛车", "搏击", "sport"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(
                Theme::Kids,
                &["少儿", "卡通", "动漫", "动画", "儿童", "kids", "cartoon"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(
                Theme::Documentary,
                &["纪实", "纪录", "探索", "地理", "documentary"],
                GENERAL_PURPOSE,
            ),
            ThematicRule::new(Theme::Music, &["音乐", "mtv", "music"], GENERAL_PURPOSE),
            ThematicRule::new(
                Theme::Opera,
                &["戏曲", "京剧", "越剧", "豫剧", "梨园"],
                GENERAL_PURPOSE,
            ),
        ];

        Self {
            national,
            provincial_network_keywords: lowered(&[
                "卫视",
                "satellite",
                "dragon tv",
                "hunan tv",
                "zhejiang tv",
                "jiangsu tv",
                "shenzhen tv",
                "金鹰卡通",
                "卡酷少儿",
                "嘉佳卡通",
                "优漫卡通",
                "哈哈炫动",
            ]),
            thematic,
            geography: builtin_geography(),
        }
    }
}

fn builtin_geography() -> Vec<GeographyRule> {
    use Province::*;
    vec![
        GeographyRule::new(Beijing, &["北京", "btv"]),
        GeographyRule::new(Tianjin, &["天津"]),
        GeographyRule::new(Hebei, &["河北", "石家庄", "唐山", "保定", "邯郸", "秦皇岛", "沧州"]),
        GeographyRule::new(Shanxi, &["山西", "太原", "大同", "晋城", "运城", "长治"]),
        GeographyRule::new(InnerMongolia, &["内蒙古", "内蒙", "呼和浩特", "包头", "鄂尔多斯"]),
        GeographyRule::new(Liaoning, &["辽宁", "沈阳", "大连", "鞍山", "锦州"]),
        GeographyRule::new(Jilin, &["吉林", "长春", "延边", "四平"]),
        GeographyRule::new(Heilongjiang, &["黑龙江", "哈尔滨", "齐齐哈尔", "大庆", "牡丹江"]),
        GeographyRule::new(Shanghai, &["上海", "东方"]),
        GeographyRule::new(Jiangsu, &["江苏", "南京", "苏州", "无锡", "常州", "徐州", "南通", "扬州"]),
        GeographyRule::new(Zhejiang, &["浙江", "杭州", "宁波", "温州", "绍兴", "嘉兴", "金华", "台州"]),
        GeographyRule::new(Anhui, &["安徽", "合肥", "芜湖", "蚌埠", "安庆"]),
        GeographyRule::new(Fujian, &["福建", "福州", "厦门", "泉州", "漳州", "东南"]),
        GeographyRule::new(Jiangxi, &["江西", "南昌", "赣州", "九江"]),
        GeographyRule::new(Shandong, &["山东", "济南", "青岛", "烟台", "潍坊", "齐鲁"]),
        GeographyRule::new(Henan, &["河南", "郑州", "洛阳", "开封", "南阳"]),
        GeographyRule::new(Hubei, &["湖北", "武汉", "宜昌", "襄阳"]),
        GeographyRule::new(Hunan, &["湖南", "长沙", "株洲", "湘潭", "岳阳"]),
        GeographyRule::new(Guangdong, &["广东", "广州", "深圳", "珠江", "佛山", "东莞", "汕头", "南方"]),
        GeographyRule::new(Guangxi, &["广西", "南宁", "桂林", "柳州"]),
        GeographyRule::new(Hainan, &["海南", "海口", "三亚", "三沙"]),
        GeographyRule::new(Chongqing, &["重庆"]),
        GeographyRule::new(Sichuan, &["四川", "成都", "绵阳", "南充", "西充", "德阳", "宜宾", "泸州"]),
        GeographyRule::new(Guizhou, &["贵州", "贵阳", "遵义"]),
        GeographyRule::new(Yunnan, &["云南", "昆明", "大理", "丽江"]),
        GeographyRule::new(Tibet, &["西藏", "拉萨"]),
        GeographyRule::new(Shaanxi, &["陕西", "西安", "宝鸡", "咸阳", "延安"]),
        GeographyRule::new(Gansu, &["甘肃", "兰州", "天水"]),
        GeographyRule::new(Qinghai, &["青海", "西宁"]),
        GeographyRule::new(Ningxia, &["宁夏", "银川"]),
        GeographyRule::new(Xinjiang, &["新疆", "乌鲁木齐", "兵团"]),
        GeographyRule::new(HongKong, &["香港", "翡翠", "明珠", "tvb", "viutv", "凤凰"]),
        GeographyRule::new(Macau, &["澳门", "澳視", "澳视", "澳亚"]),
        GeographyRule::new(Taiwan, &["台湾", "台视", "中视", "华视", "民视", "东森", "中天", "三立"]),
    ]
}

/// Allow/deny keyword lists of the foreign filter
#[derive(Debug, Clone)]
pub struct FilterTables {
    /// Permitted special-territory broadcasters; checked first
    pub allowed: Vec<String>,
    /// Foreign broadcasters
    pub denied: Vec<String>,
}

impl Default for FilterTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FilterTables {
    pub fn builtin() -> Self {
        Self {
            allowed: lowered(&[
                "凤凰", "翡翠", "明珠", "tvb", "viutv", "香港", "澳门", "澳視", "澳视", "澳亚",
                "台视", "中视", "华视", "民视", "东森", "中天", "三立", "星空",
            ]),
            denied: lowered(&[
                "bbc",
                "cnn",
                "nhk",
                "hbo",
                "fox",
                "espn",
                "cnbc",
                "bloomberg",
                "al jazeera",
                "aljazeera",
                "france 24",
                "france24",
                "euronews",
                "sky news",
                "arirang",
                "kbs",
                "mbc",
                "sbs",
                "abc",
                "nbc",
                "cbs",
            ]),
        }
    }

    /// Append extra allow-list keywords
    pub fn with_allowed<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_lowered(&mut self.allowed, extra);
        self
    }

    /// Append extra deny-list keywords
    pub fn with_denied<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_lowered(&mut self.denied, extra);
        self
    }
}

fn lowered(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

fn extend_lowered<I, S>(target: &mut Vec<String>, extra: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for word in extra {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !target.contains(&word) {
            target.push(word);
        }
    }
}

/// True when `haystack` contains any of `needles`
pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
