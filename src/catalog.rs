use crate::models::{Friend, Quote, RecommendedGroup};
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const RECOMMENDED_HABITS: &[RecommendedGroup] = &[
    RecommendedGroup {
        category: "건강",
        items: &["물 마시기 💧", "스트레칭 🧘", "영양제 먹기 💊", "7시간 수면 😴"],
    },
    RecommendedGroup {
        category: "성장",
        items: &["독서 30분 📚", "영어 단어 5개 🅰️", "뉴스 읽기 📰", "일기 쓰기 ✍️"],
    },
    RecommendedGroup {
        category: "마음챙김",
        items: &["명상하기 🧘‍♀️", "감사일기 💌", "스마트폰 멀리하기 📵"],
    },
];

pub const QUOTES: &[Quote] = &[
    Quote { text: "습관은 밧줄과 같다. 매일 한 가닥씩 엮다 보면 끊을 수 없게 된다.", author: "호레이스 만" },
    Quote { text: "성공은 매일 반복되는 작은 노력들의 합이다.", author: "로버트 콜리어" },
    Quote { text: "오늘 걷지 않으면 내일은 뛰어야 한다.", author: "카를레스 푸욜" },
    Quote { text: "작은 변화가 일어날 때 진정한 삶을 살게 된다.", author: "레프 톨스토이" },
    Quote { text: "시작이 반이다.", author: "아리스토텔레스" },
    Quote { text: "미래를 예측하는 가장 좋은 방법은 미래를 창조하는 것이다.", author: "피터 드러커" },
    Quote { text: "멈추지 않는 한 얼마나 천천히 가는지는 중요하지 않다.", author: "공자" },
    Quote { text: "나중은 결코 오지 않는다. 지금 하라.", author: "익명" },
    Quote { text: "탁월함은 행동이 아니라 습관이다.", author: "아리스토텔레스" },
    Quote { text: "우리가 반복적으로 하는 것이 우리 자신이다.", author: "아리스토텔레스" },
];

const MOCK_FRIEND_NAMES: &[&str] = &["Orbit", "Nova", "Luna", "Star", "Cosmos"];
const MOCK_AVATARS: &[&str] = &["👩‍🚀", "👽", "🤖", "👻", "👾"];

/// Random 9-character lowercase id.
pub fn generate_id() -> String {
    random_string(ID_ALPHABET, 9)
}

/// Random 6-character share code, e.g. `K3ZQ0A`.
pub fn generate_user_code() -> String {
    random_string(CODE_ALPHABET, 6)
}

/// Friends are not looked up anywhere; any code yields a random stand-in.
pub fn mock_friend() -> Friend {
    let mut rng = rand::thread_rng();
    Friend {
        id: generate_id(),
        name: MOCK_FRIEND_NAMES[rng.gen_range(0..MOCK_FRIEND_NAMES.len())].to_string(),
        avatar: MOCK_AVATARS[rng.gen_range(0..MOCK_AVATARS.len())].to_string(),
        score: rng.gen_range(0..100),
        status_message: "Just joined!".to_string(),
    }
}

fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}
