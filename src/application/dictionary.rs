//! Dictionary translation of SQL identifiers into Korean labels.
//!
//! Pure and deterministic: a curated lookup, then per-token lookup over `_`/camelCase
//! splits, then a readable (title-cased) rendering of the identifier itself.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static COLUMN_TERMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // identifiers
        ("id", "아이디"),
        ("uuid", "UUID"),
        ("key", "키"),
        ("code", "코드"),
        ("no", "번호"),
        ("num", "번호"),
        ("number", "번호"),
        ("seq", "순번"),
        ("idx", "인덱스"),
        ("index", "인덱스"),
        ("ref", "참조"),
        ("parent", "상위"),
        ("child", "하위"),
        ("external", "외부"),
        ("token", "토큰"),
        ("hash", "해시"),
        ("slug", "슬러그"),
        ("version", "버전"),
        ("user_id", "사용자 ID"),
        ("userid", "사용자 ID"),
        ("order_id", "주문 ID"),
        ("product_id", "상품 ID"),
        // names and people
        ("name", "이름"),
        ("first", "이름"),
        ("last", "성"),
        ("first_name", "이름"),
        ("last_name", "성"),
        ("full", "전체"),
        ("nickname", "닉네임"),
        ("username", "사용자명"),
        ("title", "제목"),
        ("label", "라벨"),
        ("user", "사용자"),
        ("member", "회원"),
        ("customer", "고객"),
        ("client", "클라이언트"),
        ("admin", "관리자"),
        ("owner", "소유자"),
        ("author", "작성자"),
        ("creator", "생성자"),
        ("writer", "작성자"),
        ("manager", "관리자"),
        ("employee", "직원"),
        ("staff", "직원"),
        ("role", "역할"),
        ("gender", "성별"),
        ("age", "나이"),
        ("birth", "생년월일"),
        ("birthday", "생일"),
        ("birth_date", "생년월일"),
        // contact
        ("email", "이메일"),
        ("mail", "메일"),
        ("phone", "전화번호"),
        ("mobile", "휴대폰"),
        ("tel", "전화"),
        ("fax", "팩스"),
        ("address", "주소"),
        ("addr", "주소"),
        ("zip", "우편번호"),
        ("zipcode", "우편번호"),
        ("postal", "우편"),
        ("city", "도시"),
        ("country", "국가"),
        ("region", "지역"),
        ("state", "상태"),
        ("website", "웹사이트"),
        ("url", "URL"),
        ("ip", "IP"),
        // auth
        ("password", "비밀번호"),
        ("pwd", "비밀번호"),
        ("salt", "솔트"),
        ("login", "로그인"),
        ("logout", "로그아웃"),
        ("session", "세션"),
        ("permission", "권한"),
        ("verified", "인증 여부"),
        ("otp", "일회용 비밀번호"),
        // timestamps
        ("created", "생성"),
        ("updated", "수정"),
        ("deleted", "삭제"),
        ("modified", "수정"),
        ("created_at", "생성일시"),
        ("updated_at", "수정일시"),
        ("deleted_at", "삭제일시"),
        ("modified_at", "수정일시"),
        ("createdat", "생성일시"),
        ("updatedat", "수정일시"),
        ("deletedat", "삭제일시"),
        ("created_by", "생성자"),
        ("updated_by", "수정자"),
        ("at", "일시"),
        ("by", "작성자"),
        ("date", "날짜"),
        ("time", "시간"),
        ("datetime", "일시"),
        ("timestamp", "타임스탬프"),
        ("year", "연도"),
        ("month", "월"),
        ("day", "일"),
        ("hour", "시"),
        ("minute", "분"),
        ("start", "시작"),
        ("end", "종료"),
        ("started", "시작"),
        ("ended", "종료"),
        ("expired", "만료"),
        ("expires", "만료"),
        ("expiry", "만료"),
        ("due", "마감"),
        ("last_login", "마지막 로그인"),
        ("published", "게시"),
        ("registered", "등록"),
        // status flags
        ("status", "상태"),
        ("type", "유형"),
        ("kind", "종류"),
        ("category", "카테고리"),
        ("level", "레벨"),
        ("grade", "등급"),
        ("rank", "순위"),
        ("priority", "우선순위"),
        ("is", "여부"),
        ("has", "보유"),
        ("active", "활성"),
        ("enabled", "활성화"),
        ("disabled", "비활성화"),
        ("visible", "표시"),
        ("hidden", "숨김"),
        ("public", "공개"),
        ("private", "비공개"),
        ("locked", "잠금"),
        ("blocked", "차단"),
        ("flag", "플래그"),
        ("is_active", "활성 여부"),
        ("is_deleted", "삭제 여부"),
        ("approved", "승인"),
        ("rejected", "반려"),
        ("pending", "대기"),
        // content
        ("content", "내용"),
        ("contents", "내용"),
        ("body", "본문"),
        ("text", "텍스트"),
        ("description", "설명"),
        ("desc", "설명"),
        ("summary", "요약"),
        ("memo", "메모"),
        ("note", "메모"),
        ("comment", "댓글"),
        ("message", "메시지"),
        ("subject", "제목"),
        ("tag", "태그"),
        ("tags", "태그"),
        ("keyword", "키워드"),
        ("view", "조회"),
        ("views", "조회수"),
        ("view_count", "조회수"),
        ("like", "좋아요"),
        ("likes", "좋아요"),
        ("score", "점수"),
        ("rating", "평점"),
        ("review", "리뷰"),
        ("answer", "답변"),
        ("question", "질문"),
        ("reason", "사유"),
        ("result", "결과"),
        ("option", "옵션"),
        ("options", "옵션"),
        ("setting", "설정"),
        ("settings", "설정"),
        ("config", "설정"),
        ("data", "데이터"),
        ("value", "값"),
        ("meta", "메타"),
        ("metadata", "메타데이터"),
        ("lang", "언어"),
        ("language", "언어"),
        ("locale", "로케일"),
        // amounts
        ("amount", "금액"),
        ("price", "가격"),
        ("cost", "비용"),
        ("fee", "수수료"),
        ("tax", "세금"),
        ("total", "합계"),
        ("sum", "합계"),
        ("balance", "잔액"),
        ("discount", "할인"),
        ("point", "포인트"),
        ("points", "포인트"),
        ("quantity", "수량"),
        ("qty", "수량"),
        ("count", "개수"),
        ("cnt", "개수"),
        ("stock", "재고"),
        ("currency", "통화"),
        ("rate", "비율"),
        ("ratio", "비율"),
        ("percent", "퍼센트"),
        ("weight", "무게"),
        ("height", "높이"),
        ("width", "너비"),
        ("length", "길이"),
        ("size", "크기"),
        ("min", "최소"),
        ("max", "최대"),
        ("avg", "평균"),
        // files
        ("file", "파일"),
        ("files", "파일"),
        ("path", "경로"),
        ("image", "이미지"),
        ("img", "이미지"),
        ("photo", "사진"),
        ("thumbnail", "썸네일"),
        ("avatar", "프로필 이미지"),
        ("attachment", "첨부파일"),
        ("extension", "확장자"),
        ("mime", "MIME 유형"),
        ("link", "링크"),
        // organisation and commerce
        ("company", "회사"),
        ("organization", "조직"),
        ("org", "조직"),
        ("department", "부서"),
        ("dept", "부서"),
        ("team", "팀"),
        ("group", "그룹"),
        ("project", "프로젝트"),
        ("order", "주문"),
        ("product", "상품"),
        ("item", "항목"),
        ("goods", "상품"),
        ("brand", "브랜드"),
        ("shop", "상점"),
        ("store", "매장"),
        ("cart", "장바구니"),
        ("payment", "결제"),
        ("invoice", "청구서"),
        ("coupon", "쿠폰"),
        ("delivery", "배송"),
        ("shipping", "배송"),
        ("tracking", "추적"),
        ("refund", "환불"),
        ("account", "계정"),
        ("bank", "은행"),
        ("card", "카드"),
        ("contract", "계약"),
        ("post", "게시글"),
        ("board", "게시판"),
        ("article", "기사"),
        ("notice", "공지"),
        ("event", "이벤트"),
        ("log", "로그"),
        ("history", "이력"),
        ("sort", "정렬"),
        ("order_no", "주문번호"),
    ]
    .into_iter()
    .collect()
});

static TABLE_TERMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("users", "사용자"),
        ("user", "사용자"),
        ("members", "회원"),
        ("member", "회원"),
        ("accounts", "계정"),
        ("customers", "고객"),
        ("admins", "관리자"),
        ("roles", "역할"),
        ("permissions", "권한"),
        ("sessions", "세션"),
        ("profiles", "프로필"),
        ("orders", "주문"),
        ("order", "주문"),
        ("order_items", "주문 상품"),
        ("products", "상품"),
        ("product", "상품"),
        ("items", "항목"),
        ("categories", "카테고리"),
        ("brands", "브랜드"),
        ("carts", "장바구니"),
        ("cart_items", "장바구니 상품"),
        ("payments", "결제"),
        ("transactions", "거래"),
        ("invoices", "청구서"),
        ("refunds", "환불"),
        ("coupons", "쿠폰"),
        ("deliveries", "배송"),
        ("shipments", "배송"),
        ("addresses", "주소"),
        ("inventory", "재고"),
        ("inventories", "재고"),
        ("stocks", "재고"),
        ("reviews", "리뷰"),
        ("ratings", "평점"),
        ("posts", "게시글"),
        ("articles", "기사"),
        ("boards", "게시판"),
        ("comments", "댓글"),
        ("replies", "답글"),
        ("notices", "공지사항"),
        ("notifications", "알림"),
        ("messages", "메시지"),
        ("tags", "태그"),
        ("files", "파일"),
        ("attachments", "첨부파일"),
        ("images", "이미지"),
        ("logs", "로그"),
        ("audit_logs", "감사 로그"),
        ("histories", "이력"),
        ("events", "이벤트"),
        ("settings", "설정"),
        ("companies", "회사"),
        ("departments", "부서"),
        ("employees", "직원"),
        ("teams", "팀"),
        ("projects", "프로젝트"),
        ("tasks", "작업"),
    ]
    .into_iter()
    .collect()
});

/// Korean label for a column. A non-empty comment always wins.
pub fn translate_column_name(name: &str, comment: Option<&str>) -> String {
    if let Some(comment) = comment {
        let trimmed = comment.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let lower = name.to_lowercase();
    if let Some(hit) = COLUMN_TERMS.get(lower.as_str()) {
        return (*hit).to_string();
    }

    let tokens = split_identifier(name);
    let mut changed = false;
    let translated: Vec<String> = tokens
        .iter()
        .map(|token| match COLUMN_TERMS.get(token.to_lowercase().as_str()) {
            Some(hit) => {
                changed = true;
                (*hit).to_string()
            }
            None => token.clone(),
        })
        .collect();

    if changed {
        translated.join(" ")
    } else {
        format_readable(name)
    }
}

/// Korean label for a table: exact business-noun hit, else readable formatting.
pub fn translate_table_name(name: &str) -> String {
    TABLE_TERMS
        .get(name.to_lowercase().as_str())
        .map(|hit| (*hit).to_string())
        .unwrap_or_else(|| format_readable(name))
}

/// `user_profile` / `userProfile` -> `User Profile`. Non-ASCII text passes through.
pub fn format_readable(name: &str) -> String {
    split_identifier(name)
        .iter()
        .map(|word| title_case(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on `_`, `-`, whitespace and ASCII camelCase boundaries (`HTTPServer` -> `HTTP`, `Server`).
pub fn split_identifier(name: &str) -> Vec<String> {
    let mut words = Vec::new();

    for part in name.split(|c: char| c == '_' || c == '-' || c.is_whitespace()) {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_uppercase() && !current.is_empty() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                let boundary = prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower);
                if boundary {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}
