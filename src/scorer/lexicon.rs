//! Weighted word lists for emotion and energy scoring.
//!
//! All weights are 1.0 today; the weight stays in the model so individual
//! lists can be rebalanced without touching the scoring loop.

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub struct WeightedList {
    pub words: HashSet<&'static str>,
    pub weight: f64,
}

impl WeightedList {
    fn new(words: &'static [&'static str], weight: f64) -> Self {
        Self {
            words: words.iter().copied().collect(),
            weight,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

pub struct EmotionLists {
    pub joy: WeightedList,
    pub sadness: WeightedList,
    pub anger: WeightedList,
    pub fear: WeightedList,
    pub surprise: WeightedList,
    pub disgust: WeightedList,
}

impl EmotionLists {
    /// Lists in the fixed scoring order: joy, sadness, anger, fear,
    /// surprise, disgust.
    pub fn all(&self) -> [&WeightedList; 6] {
        [
            &self.joy,
            &self.sadness,
            &self.anger,
            &self.fear,
            &self.surprise,
            &self.disgust,
        ]
    }
}

pub struct EnergyLists {
    pub high: WeightedList,
    pub low: WeightedList,
}

pub static EMOTIONS: Lazy<EmotionLists> = Lazy::new(|| EmotionLists {
    joy: WeightedList::new(JOY_WORDS, 1.0),
    sadness: WeightedList::new(SADNESS_WORDS, 1.0),
    anger: WeightedList::new(ANGER_WORDS, 1.0),
    fear: WeightedList::new(FEAR_WORDS, 1.0),
    surprise: WeightedList::new(SURPRISE_WORDS, 1.0),
    disgust: WeightedList::new(DISGUST_WORDS, 1.0),
});

pub static ENERGY: Lazy<EnergyLists> = Lazy::new(|| EnergyLists {
    high: WeightedList::new(HIGH_ENERGY_WORDS, 1.0),
    low: WeightedList::new(LOW_ENERGY_WORDS, 1.0),
});

const JOY_WORDS: &[&str] = &[
    "love", "happy", "joy", "amazing", "wonderful", "great", "fantastic", "awesome",
    "beautiful", "perfect", "brilliant", "excellent", "good", "best", "smile", "laugh",
    "fun", "exciting", "celebrate", "victory", "win", "success", "hope", "dream",
    "peace", "freedom", "light", "bright", "shine", "dance", "party", "bliss",
    "ecstasy", "euphoria", "delight", "cheerful", "elated", "gleeful", "jubilant",
    "radiant",
];

const SADNESS_WORDS: &[&str] = &[
    "sad", "cry", "tears", "broken", "lost", "alone", "dark", "death", "hurt", "pain",
    "sorrow", "grief", "melancholy", "despair", "hopeless", "empty", "void", "lonely",
    "abandoned", "devastated", "heartbroken", "miserable", "depressed", "gloomy",
    "mourn", "weep", "anguish", "suffering", "tragic", "unfortunate",
];

const ANGER_WORDS: &[&str] = &[
    "angry", "hate", "rage", "fury", "mad", "pissed", "furious", "livid", "outraged",
    "enraged", "irate", "hostile", "aggressive", "violent", "fight", "battle", "war",
    "destroy", "kill", "attack", "revenge", "vengeance", "bitter", "resentful",
    "indignant", "wrathful", "incensed", "infuriated", "seething", "boiling",
];

const FEAR_WORDS: &[&str] = &[
    "fear", "scared", "afraid", "terrified", "panic", "anxiety", "worry", "nervous",
    "frightened", "horror", "terror", "dread", "phobia", "paranoid", "anxious",
    "stressed", "overwhelmed", "threatened", "vulnerable", "insecure", "apprehensive",
    "alarmed", "startled", "petrified", "horrified", "spooked", "uneasy", "troubled",
    "disturbed", "concerned",
];

const SURPRISE_WORDS: &[&str] = &[
    "surprise", "shocked", "amazed", "astonished", "stunned", "bewildered", "confused",
    "puzzled", "perplexed", "baffled", "mystified", "flabbergasted", "astounded",
    "dumbfounded", "speechless", "awestruck", "thunderstruck", "startled",
    "taken aback", "caught off guard", "unexpected", "sudden", "abrupt", "unforeseen",
    "remarkable", "extraordinary", "incredible", "unbelievable", "mind-blowing",
    "jaw-dropping",
];

const DISGUST_WORDS: &[&str] = &[
    "disgusting", "gross", "sick", "nasty", "revolting", "repulsive", "vile", "foul",
    "awful", "terrible", "horrible", "hideous", "loathsome", "abhorrent", "detestable",
    "repugnant", "offensive", "appalling", "sickening", "nauseating", "putrid",
    "rotten", "filthy", "dirty", "contaminated", "toxic", "poisonous", "corrupt",
    "tainted", "despicable",
];

const HIGH_ENERGY_WORDS: &[&str] = &[
    "run", "jump", "fast", "quick", "rush", "speed", "power", "strong", "loud",
    "scream", "shout", "fight", "battle", "fire", "explosion", "thunder", "storm",
    "wild", "crazy", "intense", "extreme", "maximum", "boost", "pump", "energy",
    "electric", "shock", "bang", "crash", "smash", "break", "destroy", "rage",
    "explosive", "dynamic", "vigorous", "forceful", "aggressive", "fierce",
    "turbulent",
];

const LOW_ENERGY_WORDS: &[&str] = &[
    "slow", "calm", "quiet", "soft", "gentle", "peaceful", "rest", "sleep", "relax",
    "chill", "cool", "smooth", "easy", "simple", "still", "silent", "whisper",
    "breathe", "meditate", "zen", "serene", "tranquil", "mellow", "lazy", "tired",
    "weak", "fade", "drift", "float", "dream", "comfort", "soothing", "placid",
    "subdued", "passive", "lethargic", "sluggish", "drowsy", "sleepy", "inactive",
];
