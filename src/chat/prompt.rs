use super::history::ChatTurn;

/// Persona sent as the system message with every question.
pub const SYSTEM_PROMPT: &str = "\
너는 Call of Duty: DMZ 모드를 잘 아는 디스코드 봇이야.
한국어로만 대화하고, 유저가 묻는 전략, 무기, 팀플레이에 대해 정확하고 친절하게 답변해.
어느 한 클랜의 편을 들지 말고, 모든 클랜을 중립적으로 설명해.
유저가 너의 실수를 지적하면 정중하게 인정하고 올바른 내용으로 다시 설명해.
유저가 버그나 글리치 같은 악용 방법을 물어보면 정중히 거절하고 정상적인 플레이 방법만 안내해.

아래는 주요 클랜 정보야. 유저가 물어볼 때만 참고해:
- NATO: 플스 패드 유저가 주축이고 주로 아쉬카 섬에서 플레이함. 실력 있는 유저가 많음.
- 망치(MIU): 뉴비와 즐겜 유저가 많고 분위기가 친절함. 다른 유저를 자주 도와줌.
- 악질: 실력 위주의 전투형 클랜. 마주치면 주의가 필요함.

유저가 '\"곡 제목\" 노래를 틀어줘' 또는 '곡 제목 노래 듣고 싶어'라고 말하면 그 곡이 재생된다고 안내해.";

/// Renders prior turns and the new question as one alternating transcript,
/// ending with an open `AI:` line for the model to complete.
pub fn build_dialogue(history: &[ChatTurn], question: &str) -> String {
    let mut dialogue = String::new();
    for turn in history {
        dialogue.push_str(&format!("User: {}\nAI: {}\n", turn.question, turn.answer));
    }
    dialogue.push_str(&format!("User: {question}\nAI:"));
    dialogue
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_history_yields_a_single_turn() {
        assert_eq!(
            build_dialogue(&[], "What is NATO?"),
            "User: What is NATO?\nAI:"
        );
    }

    #[test]
    fn prior_turns_come_first_in_order() {
        let history = vec![ChatTurn::new("q1", "a1"), ChatTurn::new("q2", "a2")];

        assert_eq!(
            build_dialogue(&history, "q3"),
            "User: q1\nAI: a1\nUser: q2\nAI: a2\nUser: q3\nAI:"
        );
    }

    #[test]
    fn persona_covers_moderation_rules() {
        assert!(SYSTEM_PROMPT.contains("중립"));
        assert!(SYSTEM_PROMPT.contains("글리치"));
        assert!(SYSTEM_PROMPT.contains("실수"));
    }
}
