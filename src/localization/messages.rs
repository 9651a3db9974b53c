/// supported languages for the bot UI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    En,
    #[default]
    Ru,
}

impl Lang {
    /// creates Lang from Telegram's language_code (e.g., "ru", "en", "uk"), using `fallback` when absent
    pub fn from_code(code: Option<&str>, fallback: Lang) -> Self {
        match code {
            Some(code) if code.starts_with("ru") => Lang::Ru,
            Some(_) => Lang::En,
            None => fallback,
        }
    }

    /// parses a configured language name such as "en" or "RU"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Lang::En),
            "ru" | "russian" => Some(Lang::Ru),
            _ => None,
        }
    }
}

// =============================================================================
// Role selection
// =============================================================================

impl Lang {
    pub fn start_message(&self, first_name: &str) -> String {
        match self {
            Lang::En => format!(
                "👋 Hello, {}!\n\n\
                This bot connects translators and clients in our group.\n\n\
                Who are you?",
                first_name
            ),
            Lang::Ru => format!(
                "👋 Привет, {}!\n\n\
                Этот бот помогает переводчикам и клиентам найти друг друга в нашей группе.\n\n\
                Кто вы?",
                first_name
            ),
        }
    }

    pub fn translator_button(&self) -> &'static str {
        match self {
            Lang::En => "🗣 I am a translator",
            Lang::Ru => "🗣 Я переводчик",
        }
    }

    pub fn client_button(&self) -> &'static str {
        match self {
            Lang::En => "🙋 I need a translator",
            Lang::Ru => "🙋 Мне нужен переводчик",
        }
    }
}

// =============================================================================
// Translator registration
// =============================================================================

impl Lang {
    pub fn translator_selected(&self) -> &'static str {
        match self {
            Lang::En => "🗣 <b>Translator registration</b>\n\nPlease tell me your name.",
            Lang::Ru => "🗣 <b>Регистрация переводчика</b>\n\nКак вас зовут?",
        }
    }

    pub fn translator_city_prompt(&self, name: &str) -> String {
        match self {
            Lang::En => format!("Nice to meet you, {}! Which city do you work in?", name),
            Lang::Ru => format!("Приятно познакомиться, {}! В каком городе вы работаете?", name),
        }
    }

    /// re-asks the city after the form stepped back from the level question
    pub fn translator_city_again(&self) -> &'static str {
        match self {
            Lang::En => "Let's go back one step. Which city do you work in?",
            Lang::Ru => "Вернёмся на шаг назад. В каком городе вы работаете?",
        }
    }

    pub fn translator_level_prompt(&self) -> &'static str {
        match self {
            Lang::En => "What is your German level? (A1, A2, B1, B2, C1, C2 or NATIVE)",
            Lang::Ru => "Какой у вас уровень немецкого? (A1, A2, B1, B2, C1, C2 или NATIVE)",
        }
    }

    pub fn translator_level_invalid(&self) -> &'static str {
        match self {
            Lang::En => "❌ Unknown level. Please use one of: A1, A2, B1, B2, C1, C2, NATIVE.",
            Lang::Ru => "❌ Неизвестный уровень. Используйте один из: A1, A2, B1, B2, C1, C2, NATIVE.",
        }
    }

    pub fn translator_price_prompt(&self) -> &'static str {
        match self {
            Lang::En => "What is your hourly rate in euros? (e.g. 25 or 25,50)",
            Lang::Ru => "Какая у вас ставка в час в евро? (например, 25 или 25,50)",
        }
    }

    pub fn translator_price_invalid(&self) -> &'static str {
        match self {
            Lang::En => "❌ The price must be a positive number, e.g. 25 or 25,50.",
            Lang::Ru => "❌ Цена должна быть положительным числом, например 25 или 25,50.",
        }
    }

    pub fn translator_contact_prompt(&self) -> &'static str {
        match self {
            Lang::En => "How can clients reach you? (Telegram username, phone or email)",
            Lang::Ru => "Как клиенты могут с вами связаться? (username в Telegram, телефон или email)",
        }
    }

    /// all arguments must already be HTML-escaped
    pub fn translator_registration_complete(
        &self,
        name: &str,
        city: &str,
        level: &str,
        price: &str,
        contact: &str,
    ) -> String {
        match self {
            Lang::En => format!(
                "✅ <b>Registration complete!</b>\n\n\
                • Name: {}\n\
                • City: {}\n\
                • German level: {}\n\
                • Rate: {}€/hour\n\
                • Contact: {}",
                name, city, level, price, contact
            ),
            Lang::Ru => format!(
                "✅ <b>Регистрация завершена!</b>\n\n\
                • Имя: {}\n\
                • Город: {}\n\
                • Уровень немецкого: {}\n\
                • Ставка: {}€/час\n\
                • Контакт: {}",
                name, city, level, price, contact
            ),
        }
    }

    pub fn translator_instructions(&self) -> &'static str {
        match self {
            Lang::En => {
                "📋 <b>How the group works for translators</b>\n\n\
                • Clients post their requests in the group\n\
                • Contact the client directly if you can help\n\
                • Translators may only post to ask for a replacement: include \"need replacement\" in your message\n\
                • Any other message from a translator will be flagged by the bot"
            }
            Lang::Ru => {
                "📋 <b>Правила группы для переводчиков</b>\n\n\
                • Клиенты публикуют запросы в группе\n\
                • Если можете помочь, напишите клиенту напрямую\n\
                • Переводчики могут писать в группу только для поиска замены: добавьте в сообщение \"нужна замена\"\n\
                • Остальные сообщения переводчиков бот будет отмечать"
            }
        }
    }
}

// =============================================================================
// Client registration
// =============================================================================

impl Lang {
    pub fn client_selected(&self) -> &'static str {
        match self {
            Lang::En => "🙋 <b>Client registration</b>\n\nWhich city do you need a translator in?",
            Lang::Ru => "🙋 <b>Регистрация клиента</b>\n\nВ каком городе вам нужен переводчик?",
        }
    }

    pub fn client_verification_prompt(&self) -> &'static str {
        match self {
            Lang::En => {
                "To keep the group useful, please describe briefly what you need help with \
                (e.g. a doctor's appointment, a visit to the job center)."
            }
            Lang::Ru => {
                "Чтобы группа оставалась полезной, кратко опишите, с чем вам нужна помощь \
                (например, приём у врача, визит в Jobcenter)."
            }
        }
    }

    pub fn client_suspicious(&self) -> &'static str {
        match self {
            Lang::En => {
                "⚠️ Your answer looks like a translator's description of their services. \
                If you are a translator, please register as one with /start."
            }
            Lang::Ru => {
                "⚠️ Ваш ответ похож на описание услуг переводчика. \
                Если вы переводчик, зарегистрируйтесь как переводчик через /start."
            }
        }
    }

    /// `city` must already be HTML-escaped
    pub fn client_registration_complete(&self, city: &str) -> String {
        match self {
            Lang::En => format!(
                "✅ <b>Registration complete!</b>\n\nYou can now post requests in the group. City: {}",
                city
            ),
            Lang::Ru => format!(
                "✅ <b>Регистрация завершена!</b>\n\nТеперь вы можете публиковать запросы в группе. Город: {}",
                city
            ),
        }
    }

    pub fn client_instructions(&self) -> &'static str {
        match self {
            Lang::En => {
                "📋 <b>How the group works for clients</b>\n\n\
                • Post what you need, where and when\n\
                • Translators will contact you directly\n\
                • Once you found someone, write \"translator found\" or use /found"
            }
            Lang::Ru => {
                "📋 <b>Правила группы для клиентов</b>\n\n\
                • Опишите, что нужно, где и когда\n\
                • Переводчики свяжутся с вами напрямую\n\
                • Когда найдёте переводчика, напишите \"переводчик найден\" или используйте /found"
            }
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

impl Lang {
    pub fn cancel_message(&self) -> &'static str {
        match self {
            Lang::En => "Registration cancelled. Use /start to begin again.",
            Lang::Ru => "Регистрация отменена. Используйте /start, чтобы начать заново.",
        }
    }

    pub fn help_message(&self, is_admin: bool) -> String {
        let (body, admin_line) = match self {
            Lang::En => (
                "ℹ️ <b>Available commands</b>\n\n\
                /start - register as a translator or client\n\
                /cancel - cancel the current registration\n\
                /found - tell the group you found a translator\n\
                /help - show this message",
                "\n/admin - data summary",
            ),
            Lang::Ru => (
                "ℹ️ <b>Доступные команды</b>\n\n\
                /start - регистрация переводчика или клиента\n\
                /cancel - отменить текущую регистрацию\n\
                /found - сообщить группе, что переводчик найден\n\
                /help - показать это сообщение",
                "\n/admin - сводка данных",
            ),
        };
        if is_admin {
            format!("{}{}", body, admin_line)
        } else {
            body.to_string()
        }
    }

    pub fn admin_not_allowed(&self) -> &'static str {
        match self {
            Lang::En => "⛔ This command is only available to administrators.",
            Lang::Ru => "⛔ Эта команда доступна только администраторам.",
        }
    }

    pub fn error_generic(&self) -> &'static str {
        match self {
            Lang::En => "❌ Something went wrong. Please try again later.",
            Lang::Ru => "❌ Что-то пошло не так. Попробуйте позже.",
        }
    }
}

// =============================================================================
// Group moderation
// =============================================================================

impl Lang {
    pub fn translator_found(&self) -> &'static str {
        match self {
            Lang::En => "🎉 Great, glad you found a translator! Good luck!",
            Lang::Ru => "🎉 Отлично, рады, что вы нашли переводчика! Удачи!",
        }
    }

    pub fn spam_warning(&self) -> &'static str {
        match self {
            Lang::En => "⚠️ This message looks like spam. Please keep the group on topic.",
            Lang::Ru => "⚠️ Это сообщение похоже на спам. Пожалуйста, соблюдайте тематику группы.",
        }
    }

    pub fn translator_group_restriction(&self) -> &'static str {
        match self {
            Lang::En => {
                "⛔ Translators may only post in the group to ask for a replacement \
                (include \"need replacement\"). Please contact clients directly."
            }
            Lang::Ru => {
                "⛔ Переводчики могут писать в группу только для поиска замены \
                (добавьте \"нужна замена\"). Связывайтесь с клиентами напрямую."
            }
        }
    }

    pub fn registration_required(&self) -> &'static str {
        match self {
            Lang::En => "📝 Please register with the bot first: send /start in a private chat.",
            Lang::Ru => "📝 Сначала зарегистрируйтесь в боте: отправьте /start в личном чате.",
        }
    }

    pub fn client_verification_required(&self) -> &'static str {
        match self {
            Lang::En => "🔒 Please finish client verification with /start before posting.",
            Lang::Ru => "🔒 Завершите верификацию клиента через /start, прежде чем писать в группу.",
        }
    }
}

// =============================================================================
// Admin summary
// =============================================================================

impl Lang {
    pub fn summary_title(&self) -> &'static str {
        match self {
            Lang::En => "📊 <b>Admin data summary</b>",
            Lang::Ru => "📊 <b>Сводка данных администратора</b>",
        }
    }

    pub fn summary_totals(&self, translators: usize, clients: usize, ratio: f64) -> String {
        match self {
            Lang::En => format!(
                "Total translators: {}\nTotal clients: {}\nTranslator/client ratio: {:.2}",
                translators, clients, ratio
            ),
            Lang::Ru => format!(
                "Всего переводчиков: {}\nВсего клиентов: {}\nСоотношение переводчиков/клиентов: {:.2}",
                translators, clients, ratio
            ),
        }
    }

    pub fn summary_verification(&self, verified: usize, unverified: usize, suspicious: usize) -> String {
        match self {
            Lang::En => format!(
                "<b>Client verification:</b>\n\
                • Verified clients: {}\n\
                • Unverified clients: {}\n\
                • Suspicious verifications: {}",
                verified, unverified, suspicious
            ),
            Lang::Ru => format!(
                "<b>Верификация клиентов:</b>\n\
                • Подтверждённых клиентов: {}\n\
                • Неподтверждённых клиентов: {}\n\
                • Подозрительных верификаций: {}",
                verified, unverified, suspicious
            ),
        }
    }

    pub fn summary_prices(&self, average: f64, min: f64, max: f64) -> String {
        match self {
            Lang::En => format!(
                "<b>Prices:</b>\n\
                • Average: {:.2}€\n\
                • Minimum: {:.2}€\n\
                • Maximum: {:.2}€",
                average, min, max
            ),
            Lang::Ru => format!(
                "<b>Информация о ценах:</b>\n\
                • Средняя цена: {:.2}€\n\
                • Минимальная цена: {:.2}€\n\
                • Максимальная цена: {:.2}€",
                average, min, max
            ),
        }
    }

    pub fn summary_translators_by_city(&self) -> &'static str {
        match self {
            Lang::En => "<b>Translators by city:</b>",
            Lang::Ru => "<b>Переводчики по городам:</b>",
        }
    }

    pub fn summary_clients_by_city(&self) -> &'static str {
        match self {
            Lang::En => "<b>Clients by city:</b>",
            Lang::Ru => "<b>Клиенты по городам:</b>",
        }
    }

    pub fn summary_levels(&self) -> &'static str {
        match self {
            Lang::En => "<b>German levels of translators:</b>",
            Lang::Ru => "<b>Уровни немецкого у переводчиков:</b>",
        }
    }

    pub fn summary_suspicious_title(&self) -> &'static str {
        match self {
            Lang::En => "<b>Suspicious client verifications:</b>",
            Lang::Ru => "<b>Подозрительные верификации клиентов:</b>",
        }
    }

    /// `city` and `text` must already be HTML-escaped
    pub fn summary_suspicious_entry(&self, user_id: i64, city: &str, text: &str) -> String {
        match self {
            Lang::En => format!("• User {} from {} - \"{}\"", user_id, city, text),
            Lang::Ru => format!("• Пользователь {} из {} - \"{}\"", user_id, city, text),
        }
    }

    pub fn summary_more(&self, remaining: usize) -> String {
        match self {
            Lang::En => format!("... and {} more", remaining),
            Lang::Ru => format!("... и ещё {}", remaining),
        }
    }
}
