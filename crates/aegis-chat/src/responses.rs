//! Reply content: topic replies, follow-up tips, small talk, and prefixes.
//!
//! Immutable data injected into the selector. Every list is ordered so
//! seeded selection is reproducible.

use serde::{Deserialize, Serialize};

use aegis_nlp::{KeywordTables, Sentiment};

use crate::error::ChatError;

/// A small-talk trigger set with its own reply list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationalPattern {
    pub name: String,
    /// Lowercase substrings; any hit selects this pattern.
    pub triggers: Vec<String>,
    pub replies: Vec<String>,
    /// Marks the reply as gratitude so no follow-up is offered.
    #[serde(default)]
    pub gratitude: bool,
}

/// All reply strings the selector draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBank {
    pub topic_replies: Vec<(String, Vec<String>)>,
    pub follow_ups: Vec<(String, Vec<String>)>,
    /// Checked in order; the first hit wins.
    pub conversational: Vec<ConversationalPattern>,
    pub generic: Vec<String>,
    pub sentiment_prefixes: Vec<(Sentiment, String)>,
    /// Reply to blank input.
    pub clarification: String,
    /// Used when a topic has no replies at call time.
    pub apology: String,
}

impl Default for ResponseBank {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lines(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn entry(key: &str, list: &[&str]) -> (String, Vec<String>) {
    (key.to_string(), lines(list))
}

impl ResponseBank {
    /// The shipped security-awareness replies, keyed to
    /// [`KeywordTables::builtin`] topics.
    pub fn builtin() -> Self {
        let topic_replies = vec![
            entry(
                "password",
                &[
                    "Use long passphrases of at least 12 characters and never reuse a password across sites.",
                    "A password manager can generate and remember a unique password for every account.",
                    "Change a password right away if a service you use reports a breach.",
                ],
            ),
            entry(
                "phishing",
                &[
                    "Phishing messages create urgency. Check the sender address and hover over links before clicking.",
                    "Legitimate organisations will never ask for your password by email or text.",
                    "When in doubt, contact the company through its official website instead of the link you received.",
                ],
            ),
            entry(
                "two_factor",
                &[
                    "Two-factor authentication adds a second proof of identity, so a stolen password alone is not enough.",
                    "Authenticator apps are safer than SMS codes because they cannot be intercepted by SIM swapping.",
                ],
            ),
            entry(
                "malware",
                &[
                    "Keep antivirus software enabled and only install apps from trusted sources.",
                    "Ransomware often arrives through email attachments. Don't open files you weren't expecting.",
                ],
            ),
            entry(
                "vpn",
                &[
                    "A VPN encrypts your traffic between your device and the VPN server, which helps on untrusted networks.",
                    "Choose a reputable VPN provider with a clear no-logs policy.",
                ],
            ),
            entry(
                "wifi",
                &[
                    "Secure your home Wi-Fi with WPA3 or WPA2 and a strong, unique passphrase.",
                    "Avoid logging into sensitive accounts on public hotspots without a VPN.",
                    "Change your router's default admin password and keep its firmware up to date.",
                ],
            ),
            entry(
                "encryption",
                &[
                    "Encryption scrambles data so only someone with the key can read it.",
                    "Look for HTTPS in the address bar before entering anything sensitive on a website.",
                ],
            ),
            entry(
                "firewall",
                &[
                    "A firewall filters network traffic and blocks connections you didn't ask for.",
                    "Keep your operating system's built-in firewall switched on.",
                ],
            ),
            entry(
                "updates",
                &[
                    "Software updates patch security holes. Turn on automatic updates wherever you can.",
                    "Attackers often exploit vulnerabilities that already have a fix, so update promptly.",
                ],
            ),
            entry(
                "backup",
                &[
                    "Follow the 3-2-1 rule: three copies of your data, on two kinds of media, one kept offsite.",
                    "Test restoring from your backups now and then so you know they actually work.",
                ],
            ),
            entry(
                "social_engineering",
                &[
                    "Social engineers exploit trust. Verify anyone asking for access or information, even if they sound official.",
                    "Never let strangers follow you through a secure door, however polite they seem.",
                ],
            ),
            entry(
                "privacy",
                &[
                    "Review the privacy settings on your social media accounts and limit what is public.",
                    "Think twice before sharing personal information like your address or birthday online.",
                ],
            ),
            entry(
                "network",
                &[
                    "Segment your home network so smart devices live on a separate guest network.",
                    "Unknown devices on your network are worth investigating. Check your router's client list.",
                ],
            ),
        ];

        let follow_ups = vec![
            entry(
                "password",
                &[
                    "Tip: a passphrase made of four random words is both strong and easy to remember.",
                    "Tip: check whether your email appears in known breaches and rotate those passwords first.",
                ],
            ),
            entry(
                "phishing",
                &[
                    "Tip: report phishing emails to your provider so they can block the sender for everyone.",
                    "Tip: misspelled domains like 'paypa1.com' are a classic phishing sign.",
                ],
            ),
            entry(
                "two_factor",
                &[
                    "Tip: store your 2FA recovery codes somewhere safe and offline.",
                    "Tip: start by enabling 2FA on your email account, since it can reset all the others.",
                ],
            ),
            entry(
                "malware",
                &[
                    "Tip: if you suspect an infection, disconnect from the network before investigating.",
                    "Tip: browser extensions can be malware too. Remove the ones you don't use.",
                ],
            ),
            entry(
                "vpn",
                &[
                    "Tip: a VPN doesn't make you anonymous. Websites can still track you through cookies and logins.",
                    "Tip: enable your VPN's kill switch so traffic stops if the tunnel drops.",
                ],
            ),
            entry(
                "wifi",
                &[
                    "Tip: disable WPS on your router, since it is easy to brute-force.",
                    "Tip: set your devices to forget public networks after you use them.",
                ],
            ),
            entry(
                "encryption",
                &[
                    "Tip: turn on full-disk encryption so a lost laptop doesn't mean lost data.",
                    "Tip: messaging apps with end-to-end encryption keep even the provider from reading your chats.",
                ],
            ),
            entry(
                "firewall",
                &[
                    "Tip: review which apps are allowed through your firewall and remove the ones you no longer use.",
                    "Tip: most routers include a firewall too. Make sure it's enabled.",
                ],
            ),
            entry(
                "updates",
                &[
                    "Tip: don't forget to update your router, printer, and smart-home devices as well.",
                    "Tip: restart when prompted. Many updates only take effect after a reboot.",
                ],
            ),
            entry(
                "backup",
                &[
                    "Tip: keep one backup disconnected so ransomware can't encrypt it.",
                    "Tip: automate your backups so you never have to remember to run them.",
                ],
            ),
            entry(
                "social_engineering",
                &[
                    "Tip: agree on a verification phrase with family members to spot voice-cloning scams.",
                    "Tip: urgency and authority are red flags. Slow down and verify through another channel.",
                ],
            ),
            entry(
                "privacy",
                &[
                    "Tip: use a privacy-focused browser or extension to block third-party trackers.",
                    "Tip: regularly review which apps have access to your location and contacts.",
                ],
            ),
            entry(
                "network",
                &[
                    "Tip: change your router's default SSID so it doesn't reveal the model.",
                    "Tip: disable remote administration on your router unless you really need it.",
                ],
            ),
        ];

        let conversational = vec![
            ConversationalPattern {
                name: "how_are_you".to_string(),
                triggers: lines(&["how are you"]),
                replies: lines(&[
                    "I'm running smoothly and ready to help you stay safe online!",
                    "All systems secure! How can I help you today?",
                ]),
                gratitude: false,
            },
            ConversationalPattern {
                name: "purpose".to_string(),
                triggers: lines(&["purpose", "what do you do"]),
                replies: lines(&[
                    "I'm your cybersecurity awareness assistant. Ask me about passwords, phishing, safe browsing, and more.",
                    "I help you learn how to protect yourself online, manage security tasks, and test your knowledge with quizzes.",
                ]),
                gratitude: false,
            },
            ConversationalPattern {
                name: "gratitude".to_string(),
                triggers: lines(&["thank", "thanks"]),
                replies: lines(&[
                    "You're welcome! Stay safe out there.",
                    "Happy to help! Let me know if anything else comes up.",
                ]),
                gratitude: true,
            },
        ];

        let generic = lines(&[
            "I'm not sure I understand. Try asking about passwords, phishing, or safe browsing.",
            "Could you rephrase that? You can ask me about topics like VPNs, malware, or two-factor authentication.",
            "I'm still learning! Ask me about Wi-Fi security, software updates, or data backups.",
        ]);

        let sentiment_prefixes = vec![
            (
                Sentiment::Worried,
                "I understand this can feel worrying. Let's take it one step at a time. ".to_string(),
            ),
            (Sentiment::Curious, "Great question! ".to_string()),
            (
                Sentiment::Frustrated,
                "I'm sorry this has been frustrating. ".to_string(),
            ),
            (Sentiment::Happy, "Glad to hear it! ".to_string()),
            (
                Sentiment::Confused,
                "No problem, let me explain it simply. ".to_string(),
            ),
        ];

        Self {
            topic_replies,
            follow_ups,
            conversational,
            generic,
            sentiment_prefixes,
            clarification: "I didn't catch that. Could you please type your question?".to_string(),
            apology: "Sorry, I don't have anything on that topic yet.".to_string(),
        }
    }

    /// Check that every topic the classifier can produce has at least one
    /// reply and one follow-up tip, and that no fallback list is empty.
    pub fn validate(&self, tables: &KeywordTables) -> Result<(), ChatError> {
        for topic in &tables.topics {
            if self.replies_for(&topic.key).is_none() {
                return Err(ChatError::MissingResponses(topic.key.clone()));
            }
            if self.follow_ups_for(&topic.key).is_none() {
                return Err(ChatError::MissingFollowUps(topic.key.clone()));
            }
        }
        if self.generic.is_empty() {
            return Err(ChatError::MissingResponses("generic".to_string()));
        }
        if let Some(pattern) = self.conversational.iter().find(|p| p.replies.is_empty()) {
            return Err(ChatError::MissingResponses(pattern.name.clone()));
        }
        Ok(())
    }

    /// Non-empty reply list for a topic.
    pub fn replies_for(&self, key: &str) -> Option<&[String]> {
        find_non_empty(&self.topic_replies, key)
    }

    /// Non-empty follow-up tip list for a topic.
    pub fn follow_ups_for(&self, key: &str) -> Option<&[String]> {
        find_non_empty(&self.follow_ups, key)
    }

    /// Prefix prepended to replies for this sentiment. Empty for neutral.
    pub fn prefix(&self, sentiment: Sentiment) -> &str {
        self.sentiment_prefixes
            .iter()
            .find(|(s, _)| *s == sentiment)
            .map(|(_, p)| p.as_str())
            .unwrap_or("")
    }

    /// First conversational pattern with a trigger in `lower`.
    pub fn conversational_match(&self, lower: &str) -> Option<&ConversationalPattern> {
        self.conversational
            .iter()
            .find(|p| p.triggers.iter().any(|t| lower.contains(t.as_str())))
    }
}

fn find_non_empty<'a>(table: &'a [(String, Vec<String>)], key: &str) -> Option<&'a [String]> {
    table
        .iter()
        .find(|(k, list)| k == key && !list.is_empty())
        .map(|(_, list)| list.as_slice())
}
